//! Command-line options

use chartdesk_stock::StockConfig;
use chartdesk_utils::{Config, LogFormat};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "chartdesk")]
#[command(about = "Ticker search and technical-analysis charts over HTTP", long_about = None)]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Ticker catalog JSON file (defaults to the built-in list)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Upper bound on one analysis request, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log output format: pretty or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl Args {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Command-line flags take precedence over the environment
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(format) = self.log_format {
            config.log.format = format;
        }
    }

    /// Stock configuration from the environment, overridden by flags
    pub fn stock_config(&self) -> chartdesk_stock::Result<StockConfig> {
        let mut stock = StockConfig::default().with_env()?;
        if let Some(path) = &self.catalog {
            stock.catalog_path = Some(path.clone());
        }
        if let Some(secs) = self.timeout_secs {
            stock.request_timeout = Duration::from_secs(secs);
        }
        stock.validate()?;
        Ok(stock)
    }
}
