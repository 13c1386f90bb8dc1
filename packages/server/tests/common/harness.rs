//! In-process test harness: the real router over a memory store and a
//! mock AI, driven through `tower::ServiceExt::oneshot`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use extractly::{MemoryStore, RecordStore, AI};
use server_core::{build_app, Config};

pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Build the full application around the given AI implementation.
    pub fn new(ai: impl AI + 'static) -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = build_app(
            store.clone() as Arc<dyn RecordStore>,
            Arc::new(ai),
            Config::for_tests(),
        );
        Self { router, store }
    }

    pub async fn get(&self, path: &str) -> Response<Body> {
        self.send(Request::builder().uri(path)).await
    }

    pub async fn delete(&self, path: &str) -> Response<Body> {
        self.send(Request::builder().method("DELETE").uri(path)).await
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .extension(client_addr())
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn send(&self, builder: axum::http::request::Builder) -> Response<Body> {
        let request = builder
            .extension(client_addr())
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

// The rate limiter keys on the peer address, which oneshot requests do not
// carry. Inject one the way hyper's connect-info service would.
fn client_addr() -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000)))
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
