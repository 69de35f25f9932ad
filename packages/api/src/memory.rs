//! In-memory [`Transport`] for tests: scripted responses and a request log.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

type Route = (Method, String);

#[derive(Default)]
struct Script {
    always: HashMap<Route, ApiResponse>,
    queued: HashMap<Route, VecDeque<Result<ApiResponse, String>>>,
    log: Vec<ApiRequest>,
}

/// Answers each request from its script, keyed by method and path.
///
/// Queued responses ([`once`](Self::once), [`fail_once`](Self::fail_once)) are consumed
/// first, then the standing response set with [`on`](Self::on). Anything unscripted
/// answers `404`.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    script: Arc<Mutex<Script>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer every `method path` request with `status` and `body`.
    pub fn on(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.script()
            .always
            .insert((method, path.to_string()), ApiResponse::json(status, &body));
        self
    }

    /// Answer the next `method path` request with `status` and `body`.
    pub fn once(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.script()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(ApiResponse::json(status, &body)));
        self
    }

    /// Fail the next `method path` request before any response is produced.
    pub fn fail_once(&self, method: Method, path: &str, reason: &str) -> &Self {
        self.script()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(reason.to_string()));
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script().log.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.script()
            .log
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// `(method, path)` of every request sent so far.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.script()
            .log
            .iter()
            .map(|r| (r.method, r.path.clone()))
            .collect()
    }
}

impl Transport for MemoryTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut script = self.script();
        script.log.push(request.clone());

        let route = (request.method, request.path.clone());
        if let Some(next) = script.queued.get_mut(&route).and_then(VecDeque::pop_front) {
            return next.map_err(ApiError::Transport);
        }
        Ok(script
            .always
            .get(&route)
            .cloned()
            .unwrap_or_else(|| ApiResponse::new(404, r#"{"detail": "Not found."}"#)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queued_before_standing() {
        let transport = MemoryTransport::new();
        transport
            .on(Method::Get, "/contents/", 200, json!([]))
            .once(Method::Get, "/contents/", 503, json!({}));

        let request = ApiRequest::get("/contents/");
        assert_eq!(transport.send(&request).await.unwrap().status, 503);
        assert_eq!(transport.send(&request).await.unwrap().status, 200);
        assert_eq!(transport.send(&request).await.unwrap().status, 200);
        assert_eq!(transport.count(Method::Get, "/contents/"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_is_not_found() {
        let transport = MemoryTransport::new();
        let response = transport.send(&ApiRequest::delete("/projects/9")).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(transport.calls(), vec![(Method::Delete, "/projects/9".to_string())]);
    }

    #[tokio::test]
    async fn test_fail_once() {
        let transport = MemoryTransport::new();
        transport.fail_once(Method::Post, "/users/groups/", "connection reset");
        let result = transport.send(&ApiRequest::post("/users/groups/")).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
