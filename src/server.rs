//! Web surface: the form page, its submission, a JSON API and a health check.
//!
//! Routes:
//! - `GET /` and `POST /forecast` render the HTML page
//! - `POST /api/forecast` returns the summary and chart series as JSON
//! - `GET /health`

use axum::{
    extract::{rejection::JsonRejection, Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::{ForecastError, Result};
use crate::llm::CompletionClient;
use crate::pipeline::{ForecastPipeline, ForecastReport};
use crate::render::{render_page, Outcome};
use crate::schema::{ForecastRequest, ForecastSummary, DEFAULT_YEARS};
use crate::timeline::Timeline;

pub type SharedClient = Arc<dyn CompletionClient>;

pub struct AppState {
    pipeline: ForecastPipeline<SharedClient>,
}

impl AppState {
    pub fn new(client: SharedClient) -> Self {
        Self {
            pipeline: ForecastPipeline::new(client),
        }
    }

    /// Every submission uses `year` as the current year.
    pub fn with_fixed_year(client: SharedClient, year: i32) -> Self {
        Self {
            pipeline: ForecastPipeline::new(client).with_fixed_year(year),
        }
    }
}

impl ForecastError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForecastError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ForecastError::MissingData => StatusCode::UNPROCESSABLE_ENTITY,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&ForecastError> for ErrorResponse {
    fn from(err: &ForecastError) -> Self {
        ErrorResponse {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ForecastError {
    fn from(rejection: JsonRejection) -> Self {
        ForecastError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub summary: ForecastSummary,
    pub timeline: Timeline,
}

/// Raw form fields; numbers arrive as text and blanks fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastForm {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub past_years: String,
    #[serde(default)]
    pub future_years: String,
}

impl ForecastForm {
    /// The request to echo back into the form, even when a count is unreadable.
    fn echo(&self) -> ForecastRequest {
        ForecastRequest::new(
            self.product_name.clone(),
            self.country.clone(),
            parse_years("past_years", &self.past_years).unwrap_or(DEFAULT_YEARS),
            parse_years("future_years", &self.future_years).unwrap_or(DEFAULT_YEARS),
        )
    }

    pub fn to_request(&self) -> Result<ForecastRequest> {
        Ok(ForecastRequest::new(
            self.product_name.clone(),
            self.country.clone(),
            parse_years("past_years", &self.past_years)?,
            parse_years("future_years", &self.future_years)?,
        ))
    }
}

fn parse_years(field: &str, raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_YEARS);
    }
    raw.parse().map_err(|_| {
        ForecastError::InvalidRequest(format!("{} must be a whole number, got '{}'", field, raw))
    })
}

pub fn router(client: SharedClient) -> Router {
    router_with_state(AppState::new(client))
}

pub fn router_with_state(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/forecast", post(submit_form))
        .route("/api/forecast", post(api_forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: std::net::SocketAddr, client: SharedClient) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Price forecaster listening on http://{}", addr);
    axum::serve(listener, router(client)).await
}

async fn index() -> Html<String> {
    Html(render_page(&ForecastRequest::default(), None))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn run_pipeline(state: &AppState, request: ForecastRequest) -> Result<ForecastReport> {
    state.pipeline.run(request).await.map_err(|e| {
        if e.is_upstream() {
            warn!("Forecast failed: {}", e);
        } else {
            error!("Forecast failed: {}", e);
        }
        e
    })
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ForecastForm>,
) -> Html<String> {
    let request = match form.to_request() {
        Ok(request) => request,
        Err(e) => return Html(render_page(&form.echo(), Some(Outcome::Failed(&e)))),
    };

    let echo = request.clone();
    let page = match run_pipeline(&state, request).await {
        Ok(report) => render_page(&echo, Some(Outcome::Report(&report))),
        Err(e) => render_page(&echo, Some(Outcome::Failed(&e))),
    };
    Html(page)
}

async fn api_forecast(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ForecastRequest>, JsonRejection>,
) -> std::result::Result<Json<ForecastResponse>, ForecastError> {
    let Json(request) = payload?;
    let report = run_pipeline(&state, request).await?;
    let timeline = report.timeline()?;
    Ok(Json(ForecastResponse {
        summary: report.summary,
        timeline,
    }))
}
