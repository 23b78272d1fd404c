/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::server
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Bind the HTTP listener and hand every request to the
    dispatcher, translating its responses for the wire.

  Security / Safety Notes:
    Read-only surface; no authentication is requested or
    checked. Bodies are dropped for HEAD requests.

  Dependencies:
    axum for the HTTP server, tokio for the listener and the
    shutdown signal.

  Operational Scope:
    Started once by the entry point; runs until Ctrl-C.

  Revision History:
    2026-10-17 COD  Authored HTTP boundary.
  ------------------------------------------------------------
  SSE Principles Observed:
    - All routing decisions live in the dispatcher
    - Graceful shutdown with a logged reason
============================================================*/

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use crate::error::{Result, SynGetError};
use crate::logger::Logger;
use crate::response::ApiResponse;
use crate::service::Service;
use crate::upstream::UpstreamSource;

/// Router forwarding every method and path to the dispatcher.
pub fn app<S: UpstreamSource>(service: Arc<Service<S>>) -> Router {
    Router::new().fallback(dispatch::<S>).with_state(service)
}

async fn dispatch<S: UpstreamSource>(
    State(service): State<Arc<Service<S>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let response = service.handle(method.as_str(), uri.path(), &body).await;
    into_http(response, method == Method::HEAD)
}

fn into_http(response: ApiResponse, suppress_body: bool) -> Response {
    let body = if suppress_body {
        Body::empty()
    } else {
        Body::from(response.body)
    };
    let mut http = Response::new(body);
    *http.status_mut() =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let headers = http.headers_mut();
    for (name, value) in response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            headers.insert(name, value);
        }
    }
    http
}

/// Serve until Ctrl-C.
pub async fn serve<S: UpstreamSource>(
    service: Arc<Service<S>>,
    bind: SocketAddr,
    logger: Arc<Logger>,
) -> Result<()> {
    let listener = TcpListener::bind(bind).await.map_err(|err| {
        SynGetError::Runtime(format!("Failed to bind {bind}: {err}"))
    })?;
    logger.info("LISTEN", format!("Serving on http://{}", listener.local_addr()?));

    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal(logger))
        .await
        .map_err(|err| SynGetError::Runtime(format!("HTTP server failed: {err}")))
}

async fn shutdown_signal(logger: Arc<Logger>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger.info("SHUTDOWN", "Interrupt received; draining connections"),
        Err(err) => logger.warn(
            "SHUTDOWN",
            format!("Signal handler unavailable ({err}); shutting down"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Envelope;

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn head_keeps_headers_and_drops_body() {
        let api = Envelope::new(120).data(&vec!["1.0.0"]);

        let head = into_http(api.clone(), true);
        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(
            head.headers().get("cache-control").unwrap(),
            "public, max-age=120"
        );
        assert!(body_bytes(head).await.is_empty());

        let get = into_http(api.clone(), false);
        assert_eq!(body_bytes(get).await, api.body);
    }

    #[tokio::test]
    async fn error_status_is_preserved() {
        let api = Envelope::new(60).not_found("Not Found");
        let http = into_http(api, false);
        assert_eq!(http.status(), StatusCode::NOT_FOUND);
        assert!(http
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/json"));
    }
}
