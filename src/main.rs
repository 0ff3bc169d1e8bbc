mod config;
mod extract;
mod http;
mod meli;
mod metrics;
mod models;
mod pipeline;
mod render;
mod selector;
mod sources;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use config::AppConfig;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use models::ApiError;
use pipeline::{Radar, RadarError, RadarErrorKind};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(target = "radar.api", "server crashed: {err}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    info!(
        target = "radar.api",
        urls_file = %config.urls_file,
        source_mode = ?config.source_mode,
        policy = ?config.selection_policy,
        "configuration loaded"
    );

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("prom recorder");
    let state = AppState {
        radar: Radar::new(config),
        prometheus_handle,
    };

    let cors = CorsLayer::new()
        .allow_headers(Any)
        .allow_methods(Any)
        .allow_origin(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/pacote/{turno}", get(get_package))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8000);
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!(target = "radar.api", "listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    radar: Radar,
    prometheus_handle: PrometheusHandle,
}

/// Service banner.
///
/// - Method: `GET`
/// - Path: `/`
/// - Auth: none
async fn root() -> String {
    "Radar de Ofertas online ⚡\n\
     Use /pacote/manha, /pacote/tarde ou /pacote/noite para gerar seus posts.\n"
        .to_string()
}

/// Health and readiness check.
///
/// - Method: `GET`
/// - Path: `/health`
/// - Auth: none
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "radar-api-rs",
    }))
}

async fn metrics_endpoint(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::http::Response<String> {
    if let Ok(secret) = std::env::var("METRICS_KEY") {
        let presented = headers
            .get("X-Metrics-Key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if presented != secret {
            return axum::http::Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .body("unauthorized".into())
                .unwrap();
        }
    }
    let body = state.prometheus_handle.render();
    axum::http::Response::builder()
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .unwrap()
}

/// Renders one shift's promotional package as plain text.
///
/// - Method: `GET`
/// - Path: `/pacote/{turno}` with `turno` in `manha` | `tarde` | `noite`
/// - Response: `text/plain` package body; 400 for an unknown shift
async fn get_package(
    State(state): State<AppState>,
    Path(turno): Path<String>,
) -> Result<String, AppError> {
    crate::metrics::inc_requests("/pacote");
    let today = Utc::now().date_naive();
    let body = state.radar.build_package(&turno, today).await?;
    Ok(body)
}

#[derive(Debug)]
enum AppError {
    Radar(RadarError),
}

impl From<RadarError> for AppError {
    fn from(value: RadarError) -> Self {
        Self::Radar(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Radar(err) => {
                let status = match err.kind() {
                    RadarErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                    RadarErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let payload = ApiError {
                    error: match err.kind() {
                        RadarErrorKind::InvalidInput => "invalid_shift".to_string(),
                        RadarErrorKind::Internal => "url_source".to_string(),
                    },
                    detail: Some(err.to_string()),
                };
                (status, Json(payload)).into_response()
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let _ = fmt().with_env_filter(filter).try_init();
}
