//! Shared fixtures: a scripted in-memory backend and a recording notifier.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::FixedOffset;
use facewatch::api::{ApiError, BackendClient, HttpRequest, HttpResponse, Method, Transport};
use facewatch::auth::Notifier;

/// Canned answer for one request.
#[derive(Clone)]
pub enum Reply {
    Status(u16, String),
    Unreachable,
    /// Sleep, then answer.
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::Status(200, body.to_string())
    }

    pub fn error(status: u16, body: &str) -> Self {
        Self::Status(status, body.to_string())
    }

    pub fn after(self, delay: Duration) -> Self {
        Self::Delayed(delay, Box::new(self))
    }

    fn resolve(&self) -> Result<HttpResponse, ApiError> {
        match self {
            Self::Status(status, body) => Ok(HttpResponse::new(*status, body.as_str())),
            Self::Unreachable => Err(ApiError::Transport("connection refused".to_string())),
            Self::Delayed(delay, inner) => {
                std::thread::sleep(*delay);
                inner.resolve()
            }
        }
    }
}

/// Backend stand-in: each route answers from a queue; the last reply of a
/// queue repeats. Unscripted routes are unreachable.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path == path).count()
    }

    pub fn client(self: &Arc<Self>) -> BackendClient {
        BackendClient::new(self.clone())
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(request.method, request.path.clone())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        reply.unwrap_or(Reply::Unreachable).resolve()
    }
}

#[derive(Default)]
pub struct RecordingNotifier(RefCell<Vec<String>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Notifier for &RecordingNotifier {
    fn alert(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}
