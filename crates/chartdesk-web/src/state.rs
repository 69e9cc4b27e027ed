//! Shared handler state

use chartdesk_stock::{AnalysisEngine, Catalog};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::render::Pages;

/// Everything the handlers need, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub engine: Arc<dyn AnalysisEngine>,
    pub pages: Arc<Pages>,
    /// Upper bound on one analysis call
    pub analysis_timeout: Duration,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        engine: Arc<dyn AnalysisEngine>,
        analysis_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            catalog,
            engine,
            pages: Arc::new(Pages::new()?),
            analysis_timeout,
        })
    }
}
