//! Route handlers

use axum::Json;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chartdesk_stock::validation::{self, AnalysisForm};
use chartdesk_stock::{SearchResult, search};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::error::AnalyzeError;
use crate::state::AppState;

/// Decoded `key=value` pairs; repeated keys are kept in order
type Pairs = Vec<(String, String)>;

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Response {
    match state.pages.index(Utc::now().date_naive()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render index page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// `GET /search_ticker?query=...`
///
/// Always answers with a JSON array; an unreadable query string searches for nothing.
#[instrument(skip_all)]
pub async fn search_ticker(
    State(state): State<AppState>,
    params: Result<Query<Pairs>, QueryRejection>,
) -> Json<Vec<SearchResult>> {
    let params = params.map(|Query(pairs)| pairs).unwrap_or_else(|rejection| {
        error!(error = %rejection.body_text(), "Unreadable search query");
        Vec::new()
    });
    let query = params
        .into_iter()
        .find_map(|(key, value)| (key == "query").then_some(value))
        .unwrap_or_default()
        .trim()
        .to_uppercase();

    Json(search(&state.catalog, &query))
}

/// `POST /analyze`
#[instrument(skip_all)]
pub async fn analyze(
    State(state): State<AppState>,
    form: Result<Form<Pairs>, FormRejection>,
) -> Response {
    let (symbol, outcome) = match form {
        Ok(Form(pairs)) => {
            let form: AnalysisForm = pairs.into_iter().collect();
            (symbol_hint(&form), run_analysis(&state, &form).await)
        }
        Err(rejection) => (
            String::new(),
            Err(AnalyzeError::MalformedForm(rejection.body_text())),
        ),
    };

    match outcome {
        Ok(html) => Html(html).into_response(),
        Err(e) => failure_response(&state, &symbol, &e),
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "tickers": state.catalog.len() }))
}

/// Validate, resolve, analyze, render
async fn run_analysis(state: &AppState, form: &AnalysisForm) -> Result<String, AnalyzeError> {
    let request = validation::validate(form)?.resolve_symbol(&state.catalog);

    info!(symbol = %request.symbol(), "Starting technical analysis");
    let analysis = tokio::time::timeout(
        state.analysis_timeout,
        state.engine.create_combined_analysis(&request),
    )
    .await
    .map_err(|_| AnalyzeError::Timeout(state.analysis_timeout))??;
    info!(symbol = %request.symbol(), "Analysis completed successfully");

    Ok(analysis.chart.to_html()?)
}

/// The symbol as typed, for error messages: first token, uppercased
fn symbol_hint(form: &AnalysisForm) -> String {
    form.ticker
        .as_deref()
        .and_then(|t| t.split_whitespace().next())
        .unwrap_or_default()
        .to_uppercase()
}

fn failure_response(state: &AppState, symbol: &str, err: &AnalyzeError) -> Response {
    let message = format!("Error analyzing {symbol}: {}", err.summary());
    error!(%symbol, error = %err, detail = ?err, "Analysis request failed");

    let body = state.pages.error(&message).unwrap_or_else(|e| {
        error!(error = %e, "Failed to render error page");
        "Analysis Error".to_string()
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}
