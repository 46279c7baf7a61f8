//! In-process stub of the marketplace API for client and worker tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{HeaderMap, Uri, header::AUTHORIZATION};

use crate::common::TokenPair;
use crate::storage::Session;

/// One request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct RequestLog {
    inner: Arc<Mutex<Vec<SeenRequest>>>,
}

impl RequestLog {
    pub fn record(&self, uri: &Uri, headers: &HeaderMap) {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.inner.lock().unwrap().push(SeenRequest {
            path: uri.path().to_string(),
            authorization,
        });
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.inner.lock().unwrap().clone()
    }

    pub fn last(&self) -> SeenRequest {
        self.requests().last().cloned().expect("no request recorded")
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn logged_in_session() -> Session {
    let session = Session::in_memory().unwrap();
    session
        .store(&TokenPair {
            access: "access-token".to_string(),
            refresh: "refresh-token".to_string(),
        })
        .unwrap();
    session
}
