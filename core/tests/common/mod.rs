//! Transports and navigators shared by the controller and service tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use http_body_util::BodyExt;
use tokio::sync::Notify;
use tower::ServiceExt;
use user_core::{ApiError, HttpRequest, HttpResponse, Navigator, Transport, UserClient, UserId, UserService};

pub const BASE_URL: &str = "http://users.test";

pub fn service_over(transport: Arc<dyn Transport>) -> UserService {
    UserService::new(UserClient::new(BASE_URL), transport)
}

/// Routes requests straight into the mock server's router. Clones of the
/// router share one store, so state persists across requests.
pub struct RouterTransport {
    app: Router,
}

impl RouterTransport {
    pub fn new() -> Self {
        Self {
            app: mock_server::app(),
        }
    }
}

#[async_trait]
impl Transport for RouterTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder
            .body(Body::from(request.body.unwrap_or_default()))
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_bytes();
        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Replays canned results in order and records every request it sees.
/// With a gate, each request waits for one `Notify` permit before answering.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    seen: Mutex<Vec<HttpRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail_with(&self, error: ApiError) -> &Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.url.trim_start_matches(BASE_URL)))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("script exhausted".to_string())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nav {
    List,
    Create,
    Edit(UserId),
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<Nav>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<Nav> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to_list(&self) {
        self.visits.lock().unwrap().push(Nav::List);
    }

    fn navigate_to_create(&self) {
        self.visits.lock().unwrap().push(Nav::Create);
    }

    fn navigate_to_edit(&self, id: UserId) {
        self.visits.lock().unwrap().push(Nav::Edit(id));
    }
}
