//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which lays out a temporary public root with
//! `videos/` and `audio/` directories and builds a full [`AppContext`] over it.
//! [`TestHarness::with_server`] starts Axum on a random port for HTTP-level
//! testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use showreel::config::Config;
use showreel::media::{MediaRoot, MediaStore};
use showreel::server::{create_router, AppContext};

/// The four-byte demo clip used throughout the tests.
pub const DEMO_BYTES: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// Test harness wrapping an [`AppContext`] backed by a temporary public root.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Empty `videos/` and `audio/` directories under a fresh root.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("videos")).unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        let ctx = context_for(dir.path());
        Self { ctx, dir }
    }

    /// A root holding only `videos/demo.mp4` = `DE AD BE EF`.
    pub fn with_demo() -> Self {
        let h = Self::new();
        h.write("videos/demo.mp4", &DEMO_BYTES);
        h
    }

    /// Write a file relative to the public root.
    pub fn write(&self, rel: &str, data: &[u8]) {
        std::fs::write(self.dir.path().join(rel), data).unwrap();
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone(), None)
    }

    /// Send a GET through the router, optionally with a `Range` header.
    pub async fn get(&self, uri: &str, range: Option<&str>) -> Response<Body> {
        let mut req = Request::get(uri);
        if let Some(range) = range {
            req = req.header("range", range);
        }
        self.router()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server(self) -> (Self, SocketAddr) {
        let app = create_router(self.ctx.clone(), Some(self.dir.path().to_path_buf()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }
}

/// Context over `root` with default config.
pub fn context_for(root: &Path) -> AppContext {
    AppContext::with_store(Config::default(), MediaStore::new(MediaRoot::from_root(root)))
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
