/// Module result documents printed on stdout
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Successful module run: `changed` followed by the module's payload
/// fields, in the payload struct's declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitDocument<T> {
    pub changed: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Failed module run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailDocument {
    pub failed: bool,
    pub msg: String,
    pub meta: Value,
}

/// Result of one module run, shaped like an Ansible module exit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleResult<T> {
    Exit(ExitDocument<T>),
    Fail(FailDocument),
}

impl<T> ModuleResult<T> {
    pub fn exit(changed: bool, data: T) -> Self {
        ModuleResult::Exit(ExitDocument { changed, data })
    }

    /// Failure document; `meta` that cannot be encoded is reported as `null`
    pub fn fail(msg: impl Into<String>, meta: impl Serialize) -> Self {
        let msg = msg.into();
        let meta = match serde_json::to_value(meta) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Dropping metadata of failure '{}': {}", msg, e);
                Value::Null
            }
        };
        ModuleResult::Fail(FailDocument {
            failed: true,
            msg,
            meta,
        })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModuleResult::Fail(_))
    }

    pub fn changed(&self) -> bool {
        matches!(self, ModuleResult::Exit(ExitDocument { changed: true, .. }))
    }
}
