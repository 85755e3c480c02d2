//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use wallet_playground::backend::{SimulatedBackend, WalletBackend};
use wallet_playground::config::{AppConfig, SimulatedConfig};
use wallet_playground::ledger::Ledger;
use wallet_playground::polling::{PollSettings, Poller};
use wallet_playground::{HttpServer, Shutdown, WalletService};

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body, returning status and decoded JSON.
    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status().as_u16();
        (status, res.json().await.unwrap())
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status().as_u16();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_server() -> TestServer {
    start_server_with(SimulatedConfig::default(), 3).await
}

/// Start a server whose simulated faucet drips `simulated` amounts and
/// whose poller gives up after `max_attempts` zero-delay attempts.
pub async fn start_server_with(simulated: SimulatedConfig, max_attempts: u32) -> TestServer {
    let backend = Arc::new(SimulatedBackend::new(&simulated));
    let poller = Poller::new(PollSettings::new(max_attempts, Duration::ZERO).unwrap());
    start_server_on(AppConfig::default(), backend, poller).await
}

/// Start a server around any backend, config and poller.
pub async fn start_server_on(
    config: AppConfig,
    backend: Arc<dyn WalletBackend>,
    poller: Poller,
) -> TestServer {
    let wallet = Arc::new(WalletService::new(backend, Arc::new(Ledger::in_memory()), poller));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, wallet);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TestServer {
        addr,
        client,
        shutdown,
    }
}

/// One request seen by a [`MockService`].
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    /// JSON body, `Null` when empty or not JSON.
    pub body: Value,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// JSON-RPC method name.
    pub fn rpc_method(&self) -> &str {
        self.body["method"].as_str().unwrap_or_default()
    }

    /// Wrap `result` in a JSON-RPC success envelope echoing the request id.
    pub fn rpc_result(&self, result: Value) -> (u16, Value) {
        (
            200,
            serde_json::json!({ "jsonrpc": "2.0", "id": self.body["id"].clone(), "result": result }),
        )
    }
}

/// A programmable upstream on an ephemeral port. Every request is recorded
/// and answered by the supplied closure.
pub struct MockService {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockService {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn start_programmable_service<F>(respond: F) -> MockService
where
    F: Fn(&Captured) -> (u16, Value) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let recorded = requests.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let respond = respond.clone();
            let recorded = recorded.clone();
            async move {
                let captured = Captured {
                    method,
                    path: uri.path().to_string(),
                    headers,
                    body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                };
                let (status, reply) = respond(&captured);
                recorded.lock().unwrap().push(captured);
                (StatusCode::from_u16(status).unwrap(), axum::Json(reply))
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockService { addr, requests }
}
