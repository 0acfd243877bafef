/// IBM Cloud Kubernetes Service data models
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::StatusOutcome;
use crate::error::UpstreamError;

/// Outcome of a single container-service call.
///
/// Upstream failures are data here: `is_error` stays false and the error
/// body is returned as `payload`. Use [`CallResult::into_result`] to branch
/// on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult {
    pub is_error: bool,
    pub has_changed: bool,
    pub payload: Value,
    #[serde(skip)]
    pub status: u16,
    #[serde(skip)]
    pub operation: &'static str,
}

impl CallResult {
    /// Build the result for a response, replacing the payload of a
    /// successful call with `success_payload` when one is given
    pub(crate) fn from_response(
        operation: &'static str,
        status: u16,
        payload: Value,
        success_payload: Option<Value>,
    ) -> Self {
        let has_changed = StatusOutcome::classify(status).is_ok();
        let payload = match success_payload {
            Some(replacement) if has_changed => replacement,
            _ => payload,
        };

        Self {
            is_error: false,
            has_changed,
            payload,
            status,
            operation,
        }
    }

    pub fn outcome(&self) -> StatusOutcome {
        StatusOutcome::classify(self.status)
    }

    /// Convert into a typed result: the payload on 200/204, the classified
    /// upstream error otherwise
    pub fn into_result(self) -> Result<Value, UpstreamError> {
        let outcome = self.outcome();
        if outcome.is_ok() {
            Ok(self.payload)
        } else {
            Err(UpstreamError {
                operation: self.operation,
                status: self.status,
                outcome,
                payload: self.payload,
            })
        }
    }
}

/// Lifecycle action for a worker node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum WorkerAction {
    OsReboot,
    Reload,
    Update,
}

impl std::fmt::Display for WorkerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerAction::OsReboot => write!(f, "os_reboot"),
            WorkerAction::Reload => write!(f, "reload"),
            WorkerAction::Update => write!(f, "update"),
        }
    }
}

/// Body of the worker update PUT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCommand {
    pub action: WorkerAction,
    pub force: bool,
}

impl WorkerCommand {
    pub fn new(action: WorkerAction, force: bool) -> Self {
        Self { action, force }
    }

    /// Forced reload, as issued by the node-reload workflow
    pub fn forced_reload() -> Self {
        Self::new(WorkerAction::Reload, true)
    }
}

/// ALB visibility filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlbType {
    Public,
    Private,
    #[default]
    All,
}

impl AlbType {
    /// Keep only the ALBs whose `albType` matches.
    ///
    /// Handles both a bare array and an object carrying an `alb` array;
    /// any other shape (including upstream error bodies) passes through.
    pub fn filter(self, payload: Value) -> Value {
        let wanted = match self {
            AlbType::All => return payload,
            AlbType::Public => "public",
            AlbType::Private => "private",
        };

        let keep = |alb: &Value| alb.get("albType").and_then(Value::as_str) == Some(wanted);

        match payload {
            Value::Array(albs) => Value::Array(albs.into_iter().filter(keep).collect()),
            Value::Object(mut map) => {
                if let Some(Value::Array(albs)) = map.remove("alb") {
                    map.insert(
                        "alb".to_string(),
                        Value::Array(albs.into_iter().filter(keep).collect()),
                    );
                }
                Value::Object(map)
            }
            other => other,
        }
    }
}

/// Worker node as returned by the worker list endpoint.
///
/// Only the fields the reload workflow reads are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerNode {
    pub id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "poolName")]
    pub pool_name: Option<String>,
}

impl WorkerNode {
    pub fn is_ready(&self) -> bool {
        self.status == "Ready"
    }
}
