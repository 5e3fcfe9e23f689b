//! HTTP surface: one catch-all handler behind CORS, request-id and trace layers.

use crate::app::{App, Reply};
use crate::Error;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "Request rejected: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
            Reply::Health(message) => (StatusCode::OK, message).into_response(),
            Reply::Status(status) => (StatusCode::OK, Json(status)).into_response(),
            Reply::Generated(generation) => (StatusCode::OK, Json(generation)).into_response(),
        }
    }
}

/// Every path and method lands here; [`App::handle`] decides the outcome.
///
/// `OPTIONS` is answered before the body is looked at, and an unreadable body
/// (over the size limit, aborted stream) becomes a JSON error.
async fn bridge_handler(
    State(app): State<Arc<App>>,
    method: Method,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return Reply::NoContent.into_response();
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            if let Err(e) = app.ensure_configured() {
                return e.into_response();
            }
            return Error::BodyRejected {
                status: rejection.status(),
                message: rejection.body_text(),
            }
            .into_response();
        }
    };
    let query = query.map(|Query(q)| q).unwrap_or_default();

    match app.handle(&method, &query, &body).await {
        Ok(reply) => reply.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Build the router with all middleware layers.
///
/// CORS headers are set on every response, errors and 204s included.
pub fn build_router(app: Arc<App>) -> Router {
    Router::new()
        .fallback(bridge_handler)
        .with_state(app)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Serve until Ctrl+C.
pub async fn serve(app: Arc<App>, listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, build_router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
