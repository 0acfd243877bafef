/// Worker node queries and lifecycle commands
use serde_json::json;
use tracing::info;

use super::client::ContainerServiceClient;
use super::models::{CallResult, WorkerCommand};
use crate::error::Result;

/// Operations on a single worker node of a cluster
#[derive(Clone)]
pub struct WorkerClient {
    client: ContainerServiceClient,
    cluster_id: String,
    worker_id: String,
    resource_group: Option<String>,
}

impl WorkerClient {
    pub fn new(
        client: ContainerServiceClient,
        cluster_id: impl Into<String>,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cluster_id: cluster_id.into(),
            worker_id: worker_id.into(),
            resource_group: None,
        }
    }

    /// Send `X-Auth-Resource-Group` with every request for this worker
    pub fn with_resource_group(mut self, resource_group: Option<String>) -> Self {
        self.resource_group = resource_group.filter(|rg| !rg.is_empty());
        self
    }

    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    fn path(&self) -> String {
        format!("v1/clusters/{}/workers/{}", self.cluster_id, self.worker_id)
    }

    pub fn url(&self) -> String {
        self.client.url(&self.path())
    }

    /// Get worker node details
    pub async fn basic_info(&self) -> Result<CallResult> {
        self.client
            .get("basic_worker_info", &self.path(), self.resource_group())
            .await
    }

    /// Reboot, reload or update the worker node.
    ///
    /// The API answers an accepted command with an empty body, so success
    /// carries `{}` as payload.
    pub async fn update_node(&self, command: &WorkerCommand) -> Result<CallResult> {
        info!(
            "Requesting {} of worker {} in cluster {} (force: {})",
            command.action, self.worker_id, self.cluster_id, command.force
        );

        let result = self
            .client
            .put(
                "update_worker_node",
                &self.path(),
                command,
                self.resource_group(),
                Some(json!({})),
            )
            .await?;

        if result.has_changed {
            info!("Worker {} accepted {}", self.worker_id, command.action);
        } else {
            info!(
                "Worker {} rejected {}: {}",
                self.worker_id,
                command.action,
                result.outcome()
            );
        }

        Ok(result)
    }
}
