//! HTTP front end for the relay.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{RelayError, ServerError};
use crate::notify::Metrics;
use crate::relay::{Relay, RelayRequest, RelayResponse, Route, UNDECODED_EVENT};

/// Serves the relay routes plus `/health` and `/metrics`.
pub struct RelayServer {
    relay: Arc<Relay>,
    /// Present when the metrics endpoint is enabled.
    metrics: Option<Arc<Metrics>>,
    max_body_bytes: usize,
}

impl RelayServer {
    /// Creates a new server around a relay.
    pub fn new(relay: Arc<Relay>, metrics: Option<Arc<Metrics>>, max_body_bytes: usize) -> Self {
        Self {
            relay,
            metrics,
            max_body_bytes,
        }
    }

    /// Binds the listening socket.
    pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
        TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed {
                addr: addr.to_string(),
                source: e,
            })
    }

    /// Accepts connections until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let server = Arc::new(self);
        tokio::pin!(shutdown);

        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "Relay server listening");
        }

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted.map_err(ServerError::AcceptFailed)?,
                _ = &mut shutdown => {
                    info!("Relay server stopped accepting connections");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let server = server.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let server = server.clone();
                    async move { Ok::<_, Infallible>(server.route(req).await) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(error = %e, %peer, "Error serving connection");
                }
            });
        }
    }

    /// Dispatches one request by path.
    async fn route(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let span = info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %req.method(),
            path = %req.uri().path(),
        );

        async move {
            if let Some(route) = Route::from_path(req.uri().path()) {
                return self.relay_request(route, req).await;
            }

            match (req.method(), req.uri().path()) {
                (&Method::GET, "/health") => json_response(StatusCode::OK, &json!({ "ok": true })),
                (&Method::GET, "/metrics") if self.metrics.is_some() => self.metrics_response(),
                _ => json_response(
                    StatusCode::NOT_FOUND,
                    &json!({ "ok": false, "error": "Not found" }),
                ),
            }
        }
        .instrument(span)
        .await
    }

    /// Reads the body and runs the relay in its own task.
    async fn relay_request(&self, route: Route, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let method = req.method().clone();

        // Only POST bodies are read; anything else is answered with 405 by the relay.
        let body = if method == Method::POST {
            match read_body(req.into_body(), self.max_body_bytes).await {
                Ok(body) => body,
                Err(e) => return relay_response(self.relay.reject(UNDECODED_EVENT, e)),
            }
        } else {
            Bytes::new()
        };

        let relay = self.relay.clone();
        let request = RelayRequest { method, route, body };

        // A panic inside the relay surfaces as a JoinError and a generic 500.
        let handled = tokio::spawn(async move { relay.handle(request).await }.in_current_span()).await;

        match handled {
            Ok(response) => relay_response(response),
            Err(e) => relay_response(
                self.relay
                    .reject(UNDECODED_EVENT, RelayError::Internal(e.to_string())),
            ),
        }
    }

    fn metrics_response(&self) -> Response<Full<Bytes>> {
        let gathered = match &self.metrics {
            Some(metrics) => metrics.gather(),
            None => return json_response(StatusCode::NOT_FOUND, &json!({ "ok": false })),
        };

        match gathered {
            Ok(text) => {
                let mut response = Response::new(Full::new(Bytes::from(text)));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; version=0.0.4"),
                );
                response
            }
            Err(e) => {
                error!(error = %e, "Failed to gather metrics");
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "ok": false, "error": "Internal server error" }),
                )
            }
        }
    }
}

/// Collects at most `limit` bytes of request body.
async fn read_body(body: Incoming, limit: usize) -> Result<Bytes, RelayError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(RelayError::PayloadTooLarge),
        Err(e) => Err(RelayError::Internal(format!("failed to read body: {}", e))),
    }
}

fn relay_response(response: RelayResponse) -> Response<Full<Bytes>> {
    json_response(response.status, &response.body)
}

fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
