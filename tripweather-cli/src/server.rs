//! Single-route JSON endpoint. Every `GET /` runs one pipeline pass.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tripweather_core::{
    ForecastProvider, Itinerary, PipelineError, ReportOptions, SummaryRecord, pipeline, present,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub itinerary: Arc<Itinerary>,
    pub provider: Arc<dyn ForecastProvider>,
    pub options: ReportOptions,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(report)).with_state(state)
}

async fn report(State(state): State<AppState>) -> Result<Json<Vec<SummaryRecord>>, ApiError> {
    let summaries = pipeline::run(&state.itinerary, state.provider.as_ref()).await?;
    Ok(Json(present::to_records(&summaries, &state.options)))
}

/// Any pipeline failure becomes an opaque 500; details go to the log only.
#[derive(Debug)]
struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = ?anyhow::Error::from(self.0), "Weather report failed");
        let body = Json(serde_json::json!({ "error": "Internal server error" }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Serving weather report on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
