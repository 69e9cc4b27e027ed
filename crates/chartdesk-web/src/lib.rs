//! HTTP front end for chartdesk
//!
//! Routes:
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/` | Index page with ticker search and the analysis form |
//! | `GET` | `/search_ticker?query=` | JSON array of up to five catalog matches |
//! | `POST` | `/analyze` | Chart document, or an error document with status 500 |
//! | `GET` | `/health` | `{"status":"ok","tickers":N}` |

pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod state;

pub use config::Args;
pub use error::{AnalyzeError, Result, WebError};
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/search_ticker", get(handlers::search_ticker))
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chartdesk_stock::analysis::ChartPoint;
    use chartdesk_stock::{
        AnalysisEngine, AnalysisRequest, AnalysisSummary, Catalog, ChartArtifact,
        CombinedAnalysis, StockError, TickerEntry, Trend,
    };
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Clone, Copy)]
    enum Outcome {
        Chart,
        Fail,
        Hang,
    }

    struct StubEngine {
        outcome: Outcome,
        seen: Mutex<Vec<AnalysisRequest>>,
    }

    impl StubEngine {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<AnalysisRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalysisEngine for StubEngine {
        async fn create_combined_analysis(
            &self,
            request: &AnalysisRequest,
        ) -> chartdesk_stock::Result<CombinedAnalysis> {
            self.seen.lock().unwrap().push(request.clone());
            match self.outcome {
                Outcome::Chart => Ok(sample_analysis(request.symbol())),
                Outcome::Fail => Err(StockError::YahooFinanceError(
                    "HTTP 503 from upstream.example".to_string(),
                )),
                Outcome::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(StockError::Other("unreachable".to_string()))
                }
            }
        }
    }

    fn sample_analysis(symbol: &str) -> CombinedAnalysis {
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let points = vec![
            ChartPoint {
                date: day(27),
                close: 100.0,
                fast_ma: None,
                slow_ma: None,
                band: None,
                rsi: None,
            },
            ChartPoint {
                date: day(28),
                close: 101.0,
                fast_ma: None,
                slow_ma: None,
                band: None,
                rsi: None,
            },
        ];
        let summary = AnalysisSummary {
            symbol: symbol.to_string(),
            display_name: None,
            start_date: day(27),
            end_date: day(28),
            first_close: 100.0,
            last_close: 101.0,
            change_pct: 1.0,
            period_high: 101.0,
            period_low: 100.0,
            latest_rsi: None,
            rsi_zone: None,
            trend: Trend::Undetermined,
            fast_period: 20,
            slow_period: 180,
        };

        CombinedAnalysis {
            summary: summary.clone(),
            signals: Vec::new(),
            chart: ChartArtifact::new(summary, points, Vec::new()),
        }
    }

    fn app(engine: Arc<StubEngine>, timeout: Duration) -> Router {
        let catalog = Catalog::from_entries([
            TickerEntry::new("AAPL", "Apple Inc."),
            TickerEntry::new("AAPLW", "Apple Warrants"),
            TickerEntry::new("MSFT", "Microsoft Corporation"),
        ])
        .unwrap();
        router(AppState::new(Arc::new(catalog), engine, timeout).unwrap())
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn analyze_request(form: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_catalog_size() {
        let response = app(StubEngine::new(Outcome::Chart), Duration::from_secs(5))
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ok", "tickers": 3 }));
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app(StubEngine::new(Outcome::Chart), Duration::from_secs(5))
            .oneshot(get_request("/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<form"));
    }

    #[tokio::test]
    async fn test_search_trims_and_uppercases_query() {
        let response = app(StubEngine::new(Outcome::Chart), Duration::from_secs(5))
            .oneshot(get_request("/search_ticker?query=%20aapl%20"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            serde_json::json!([
                { "symbol": "AAPL", "name": "Apple Inc.", "source": "predefined" },
                { "symbol": "AAPLW", "name": "Apple Warrants", "source": "predefined" },
            ])
        );
    }

    #[tokio::test]
    async fn test_search_without_query_is_empty() {
        let router = app(StubEngine::new(Outcome::Chart), Duration::from_secs(5));

        for uri in ["/search_ticker", "/search_ticker?query=", "/search_ticker?query=%20"] {
            let response = router.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_text(response).await, "[]");
        }
    }

    #[tokio::test]
    async fn test_search_repeated_query_uses_first_value() {
        let response = app(StubEngine::new(Outcome::Chart), Duration::from_secs(5))
            .oneshot(get_request("/search_ticker?query=msft&query=aapl"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body[0]["symbol"], "MSFT");
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_analyze_repeated_field_uses_first_value() {
        let engine = StubEngine::new(Outcome::Chart);
        let response = app(Arc::clone(&engine), Duration::from_secs(5))
            .oneshot(analyze_request("ticker=AAPL&ticker=MSFT&crossover_days=60&crossover_days=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let seen = engine.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].symbol(), "AAPL");
        assert_eq!(seen[0].crossover_days(), 60);
    }

    #[tokio::test]
    async fn test_analyze_padded_end_date_is_rejected() {
        let engine = StubEngine::new(Outcome::Chart);
        let response = app(Arc::clone(&engine), Duration::from_secs(5))
            .oneshot(analyze_request("ticker=AAPL&end_date=+2024-01-02+"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Invalid date format"));
        assert!(engine.seen().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_renders_chart_for_resolved_symbol() {
        let engine = StubEngine::new(Outcome::Chart);
        let response = app(Arc::clone(&engine), Duration::from_secs(5))
            .oneshot(analyze_request("ticker=aap+extra&lookback_days=90&end_date="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        assert!(body_text(response).await.contains("<svg"));

        let seen = engine.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].symbol(), "AAPL");
        assert_eq!(seen[0].lookback_days(), 90);
        assert_eq!(seen[0].crossover_days(), 180);
        assert_eq!(seen[0].end_date(), None);
    }

    #[tokio::test]
    async fn test_analyze_validation_failure() {
        let engine = StubEngine::new(Outcome::Chart);
        let response = app(Arc::clone(&engine), Duration::from_secs(5))
            .oneshot(analyze_request("ticker=aapl&lookback_days=abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("Analysis Error"));
        assert!(body.contains("Error analyzing AAPL: Invalid lookback days value"));
        assert!(engine.seen().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_missing_ticker() {
        let response = app(StubEngine::new(Outcome::Chart), Duration::from_secs(5))
            .oneshot(analyze_request("ticker=++&crossover_days=90"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Ticker symbol is required"));
    }

    #[tokio::test]
    async fn test_analyze_engine_failure_is_summarized() {
        let response = app(StubEngine::new(Outcome::Fail), Duration::from_secs(5))
            .oneshot(analyze_request("ticker=MSFT"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("Error analyzing MSFT: Analysis failed"));
        assert!(!body.contains("upstream.example"));
    }

    #[tokio::test]
    async fn test_analyze_timeout() {
        let response = app(StubEngine::new(Outcome::Hang), Duration::from_millis(20))
            .oneshot(analyze_request("ticker=MSFT"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("did not finish within"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_form_body() {
        let engine = StubEngine::new(Outcome::Chart);
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"ticker":"AAPL"}"#))
            .unwrap();

        let response = app(Arc::clone(&engine), Duration::from_secs(5))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(engine.seen().is_empty());
    }
}
