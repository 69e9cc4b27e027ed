//! Error types for the HTTP layer

use chartdesk_stock::{StockError, ValidationError};
use std::time::Duration;
use thiserror::Error;

/// Why an `/analyze` request produced no chart
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The form body could not be decoded at all
    #[error("Malformed form submission: {0}")]
    MalformedForm(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The analysis engine or chart rendering failed
    #[error("Analysis failed: {0}")]
    Analysis(#[from] StockError),

    #[error("Analysis did not finish within {} seconds", .0.as_secs())]
    Timeout(Duration),
}

impl AnalyzeError {
    /// Message shown to the user; full detail goes to the log only
    pub fn summary(&self) -> String {
        match self {
            Self::MalformedForm(_) => "the submitted form could not be read".to_string(),
            Self::Validation(e) => e.to_string(),
            Self::Analysis(e) => format!("Analysis failed: {}", e.user_message()),
            Self::Timeout(_) => self.to_string(),
        }
    }
}

/// Errors raised while setting up or running the server
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type Result<T> = std::result::Result<T, WebError>;
