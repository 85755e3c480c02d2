//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every wallet endpoint
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Serve on a bound listener until the shutdown signal fires

use axum::{
    extract::{MatchedPath, Request},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::error::ApiError;
use crate::http::{evm, solana, status};
use crate::observability::metrics;
use crate::wallet::WalletService;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<WalletService>,
}

/// HTTP server for the wallet API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &AppConfig, wallet: Arc<WalletService>) -> Self {
        let state = AppState { wallet };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The faucet and wait routes are bounded by the poll attempt budget,
    /// so the request timeout only covers the single-call routes.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let polling = Router::new()
            .route("/evm/request-faucet", post(evm::request_faucet))
            .route("/evm/wait-for-transaction", post(evm::wait_for_transaction))
            .route("/solana/request-faucet", post(solana::request_faucet))
            .route("/solana/wait-for-transaction", post(solana::wait_for_transaction));

        Router::new()
            .route("/check-env-variables", get(status::check_env_variables))
            .route("/health", get(status::health))
            .route("/accounts", get(status::accounts))
            .route("/transactions", get(status::transactions))
            .route("/evm/check-balance", post(evm::check_balance))
            .route("/evm/create-account", post(evm::create_account))
            .route("/evm/send-transaction", post(evm::send_transaction))
            .route("/solana/check-balance", post(solana::check_balance))
            .route("/solana/create-account", post(solana::create_account))
            .route("/solana/send-transaction", post(solana::send_transaction))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .merge(polling)
            .with_state(state)
            .route_layer(middleware::from_fn(track_request))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes)),
            )
            .layer(middleware::map_response(error_envelope))
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Per-route request metrics.
async fn track_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    metrics::record_request(endpoint, response.status().as_u16(), start);
    response
}

/// Rewrite bodiless or plain-text error responses produced by the router
/// or a tower layer (404, 408, 413) into the JSON error envelope.
async fn error_envelope(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Request failed");
    let mut rewritten = ApiError::Status(status, message.to_string()).into_response();
    if let Some(id) = response.headers().get(REQUEST_ID_HEADER) {
        rewritten.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    }
    rewritten
}
