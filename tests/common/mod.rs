//! Common test utilities for reconciliation tests
//!
//! Provides an in-process fake API server and recording task actions, so the
//! pipeline and reconciler can be exercised without a cluster.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{Method, Request, Response};
use cloudwatch_agent_operator::controller::reconciler::{TaskAction, TaskError};
use cloudwatch_agent_operator::crd::{AmazonCloudWatchAgent, AmazonCloudWatchAgentSpec};
use kube::client::Body;
use kube::error::ErrorResponse;
use serde_json::{json, Value};

pub const NAMESPACE: &str = "amazon-cloudwatch";
pub const NAME: &str = "agent";

pub const NAMESPACE_TERMINATING_MESSAGE: &str = "configmaps \"agent\" is forbidden: unable to create new content in namespace amazon-cloudwatch because it is being terminated";

/// An `AmazonCloudWatchAgent` as the API server would return it
pub fn agent() -> AmazonCloudWatchAgent {
    let mut agent = AmazonCloudWatchAgent::new(
        NAME,
        AmazonCloudWatchAgentSpec {
            config: r#"{"logs":{"metrics_collected":{"emf":{}}}}"#.to_string(),
            ..Default::default()
        },
    );
    agent.metadata.namespace = Some(NAMESPACE.to_string());
    agent.metadata.uid = Some("5d3e1b8a-0000-4000-8000-00000000c0de".to_string());
    agent.metadata.generation = Some(1);
    agent
}

/// A `kube::Status` failure body
pub fn status_body(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code,
    })
}

/// A `TaskError` wrapping an API error response
pub fn api_error(code: u16, reason: &str, message: &str) -> TaskError {
    TaskError::Kube(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    }))
}

/// Canned failure for requests whose path contains `path_fragment`
#[derive(Debug, Clone)]
pub struct Failure {
    pub method: Method,
    pub path_fragment: String,
    pub code: u16,
    pub reason: String,
    pub message: String,
}

/// Fake API server
///
/// - GET of the agent returns `agent` (404 when `None`)
/// - PATCH of the agent status returns `agent`
/// - PATCH of an owned kind returns a minimal object of that kind
/// - every other GET returns 404
/// - a matching `Failure` overrides all of the above
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    pub agent: Option<Value>,
    pub failures: Vec<Failure>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    pub fn with_agent(agent: &AmazonCloudWatchAgent) -> Self {
        Self {
            agent: Some(serde_json::to_value(agent).expect("agent serializes")),
            ..Default::default()
        }
    }

    pub fn fail(mut self, method: Method, path_fragment: &str, code: u16, reason: &str, message: &str) -> Self {
        self.failures.push(Failure {
            method,
            path_fragment: path_fragment.to_string(),
            code,
            reason: reason.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// Requests seen so far, as `METHOD path`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Whether any request path contained `fragment`
    pub fn touched(&self, fragment: &str) -> bool {
        self.requests().iter().any(|r| r.contains(fragment))
    }

    fn respond(&self, method: &Method, path: &str) -> (u16, Value) {
        if let Some(f) = self
            .failures
            .iter()
            .find(|f| &f.method == method && path.contains(&f.path_fragment))
        {
            return (f.code, status_body(f.code, &f.reason, &f.message));
        }

        let not_found = || (404, status_body(404, "NotFound", "not found"));

        if path.contains("/amazoncloudwatchagents/") {
            return match &self.agent {
                Some(agent) if method == Method::GET || method == Method::PATCH => {
                    (200, agent.clone())
                }
                _ => not_found(),
            };
        }

        if method == Method::PATCH {
            let name = path.rsplit('/').next().unwrap_or_default();
            if let Some((api_version, kind)) = kind_for(path) {
                return (
                    200,
                    json!({
                        "apiVersion": api_version,
                        "kind": kind,
                        "metadata": { "name": name, "namespace": NAMESPACE },
                    }),
                );
            }
        }

        not_found()
    }

    /// A client whose every request is answered by this fake
    pub fn client(&self) -> kube::Client {
        let fake = self.clone();
        let service = tower::service_fn(move |req: Request<Body>| {
            let fake = fake.clone();
            async move {
                let path = req.uri().path().to_string();
                fake.requests
                    .lock()
                    .expect("requests lock")
                    .push(format!("{} {}", req.method(), path));
                let (code, body) = fake.respond(req.method(), &path);
                let response = Response::builder()
                    .status(code)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("body serializes")))
                    .expect("valid response");
                Ok::<_, std::convert::Infallible>(response)
            }
        });
        kube::Client::new(service, "default")
    }
}

fn kind_for(path: &str) -> Option<(&'static str, &'static str)> {
    let kinds = [
        ("/configmaps/", "v1", "ConfigMap"),
        ("/serviceaccounts/", "v1", "ServiceAccount"),
        ("/services/", "v1", "Service"),
        ("/deployments/", "apps/v1", "Deployment"),
        ("/daemonsets/", "apps/v1", "DaemonSet"),
    ];
    kinds
        .iter()
        .find(|(fragment, _, _)| path.contains(fragment))
        .map(|(_, api_version, kind)| (*api_version, *kind))
}

/// Task action that records its name and returns a preset result
pub struct Recording {
    pub name: &'static str,
    pub log: Arc<Mutex<Vec<&'static str>>>,
    pub outcome: fn() -> Result<(), TaskError>,
}

#[async_trait]
impl<P: Sync> TaskAction<P> for Recording {
    async fn run(&self, _params: &P) -> Result<(), TaskError> {
        self.log.lock().expect("log lock").push(self.name);
        (self.outcome)()
    }
}

pub fn succeed() -> Result<(), TaskError> {
    Ok(())
}

pub fn fail() -> Result<(), TaskError> {
    Err(TaskError::Failed("step failed".to_string()))
}

pub fn namespace_terminating() -> Result<(), TaskError> {
    Err(api_error(403, "Forbidden", NAMESPACE_TERMINATING_MESSAGE))
}
