//! Local HTTP fixtures for integration tests.
//!
//! Each fixture is an axum server bound to 127.0.0.1:0 running on the test's
//! tokio runtime.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral port and returns `http://127.0.0.1:{port}`.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Answers one connection with `raw` bytes verbatim, then closes it.
///
/// Used for responses axum will not produce, such as a body shorter than
/// its `Content-Length`.
pub async fn serve_raw(raw: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(raw.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on (connection refused).
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// How a fake IPFS gateway answers every request.
#[derive(Clone)]
pub enum Gateway {
    Status(u16),
    Json(Value),
    Text(&'static str),
    /// Sleeps, then answers with JSON.
    Slow(Duration, Value),
}

/// A running fake gateway: base URL ending in `/ipfs/` and its hit counter.
pub struct FakeGateway {
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl FakeGateway {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn_gateway(behavior: Gateway) -> FakeGateway {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let handler = move || {
        let behavior = behavior.clone();
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            respond(behavior).await
        }
    };
    let app = Router::new().route("/ipfs/{*path}", get(handler));
    let base = serve(app).await;
    FakeGateway {
        base: format!("{}/ipfs/", base),
        hits,
    }
}

async fn respond(behavior: Gateway) -> Response {
    match behavior {
        Gateway::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap();
            (status, "gateway error").into_response()
        }
        Gateway::Json(v) => axum::Json(v).into_response(),
        Gateway::Text(t) => t.into_response(),
        Gateway::Slow(delay, v) => {
            tokio::time::sleep(delay).await;
            axum::Json(v).into_response()
        }
    }
}
