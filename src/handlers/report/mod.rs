//! REST API for the sales report.
//!
//! Endpoints:
//! - `GET /report`: totals, newest orders and employee accounts as JSON
//!
//! The response is always `200 application/json`. A report that could not be
//! built is sent as the sentinel body `[]`; see [`ReportBody`].


use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, Response};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, Span};

use crate::config::{ConfigError, ServerConfig};
use crate::interfaces::ReportStore;
use crate::report::{build_report, ReportBody, ReportOptions};
use crate::utils::bootstrap::shutdown_signal;

/// Route serving the report.
pub const REPORT_PATH: &str = "/report";

/// Time in-flight requests get to finish after a shutdown signal.
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Failed to load TLS certificate: {0}")]
    Tls(#[source] std::io::Error),

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Shared state for axum handlers.
///
/// The store is created once at startup; `None` means the server runs
/// without a database and every report is empty.
#[derive(Clone)]
pub struct ReportState {
    store: Option<Arc<dyn ReportStore>>,
    options: ReportOptions,
}

impl ReportState {
    pub fn new(store: Option<Arc<dyn ReportStore>>, options: ReportOptions) -> Self {
        Self { store, options }
    }
}

/// Start the server described by `config`.
///
/// Serves HTTPS when TLS is enabled, plain HTTP otherwise, until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: ReportState) -> Result<(), ServerError> {
    let app = router(state);
    let addr = config.socket_addr()?;

    if config.tls.enabled {
        let (cert, key) = config.tls.pem_files()?;
        let tls = RustlsConfig::from_pem_file(cert, key)
            .await
            .map_err(ServerError::Tls)?;

        let handle = axum_server::Handle::new();
        let shutdown = handle.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.graceful_shutdown(Some(GRACEFUL_SHUTDOWN_TIMEOUT));
        });

        info!(%addr, "Starting HTTPS server");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(ServerError::Serve)?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ServerError::Bind)?;

        info!(addr = %local_addr, "Starting HTTP server");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;
    }

    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: ReportState) -> Router {
    Router::new()
        .route(REPORT_PATH, get(report))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!("http", method = %request.method(), uri = %request.uri())
                })
                .on_request(|_request: &Request<Body>, _span: &Span| {
                    info!("Handling request");
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    debug!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis() as u64,
                        "Finished handling request"
                    );
                }),
        )
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn report(State(state): State<ReportState>) -> impl IntoResponse {
    let outcome = build_report(state.store.as_deref(), state.options).await;
    let body = ReportBody::render(&outcome);

    (
        [(header::CONTENT_TYPE, "application/json")],
        body.into_string(),
    )
}
