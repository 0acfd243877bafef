/// Node reload workflow: reload one, all, or each worker in turn
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::report::ModuleResult;
use crate::config::ReloadConfig;
use crate::error::{Error, Result};
use crate::iks::{
    CallResult, ClusterClient, ContainerServiceClient, StatusOutcome, WorkerClient,
    WorkerCommand, WorkerNode,
};
use crate::utils::PollingConfig;

/// How the workflow picks and paces workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReloadMode {
    /// Reload one worker
    Single,
    /// Reload each worker and wait for it to be Ready before the next
    Sequential,
    /// Reload every worker at once
    Simultaneous,
    /// Only list the worker nodes
    List,
}

impl std::fmt::Display for ReloadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReloadMode::Single => write!(f, "single"),
            ReloadMode::Sequential => write!(f, "sequential"),
            ReloadMode::Simultaneous => write!(f, "simultaneous"),
            ReloadMode::List => write!(f, "list"),
        }
    }
}

/// Outcome of one reload request.
///
/// `status` and `message` are absent when the request never got an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerReload {
    pub worker_id: String,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<StatusOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl WorkerReload {
    fn from_call(worker_id: &str, result: CallResult) -> Self {
        Self {
            worker_id: worker_id.to_string(),
            accepted: result.has_changed,
            status: Some(result.status),
            message: Some(result.outcome()),
            error: (!result.has_changed).then_some(result.payload),
        }
    }

    fn from_error(worker_id: &str, err: &Error) -> Self {
        Self {
            worker_id: worker_id.to_string(),
            accepted: false,
            status: None,
            message: None,
            error: Some(Value::String(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReloadReport {
    pub mode: ReloadMode,
    pub reloads: Vec<WorkerReload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_nodes: Option<Vec<WorkerNode>>,
    /// Error that ended the run after reloads were already issued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReloadReport {
    fn new(mode: ReloadMode) -> Self {
        Self {
            mode,
            reloads: Vec::new(),
            worker_nodes: None,
            error: None,
        }
    }

    fn succeeded(&self) -> bool {
        self.error.is_none() && self.reloads.iter().all(|r| r.accepted)
    }
}

/// Runs reloads against the workers of one cluster
pub struct NodeReloader {
    client: ContainerServiceClient,
    cluster: ClusterClient,
    config: ReloadConfig,
}

impl NodeReloader {
    pub fn new(
        client: ContainerServiceClient,
        cluster_id: impl Into<String>,
        config: ReloadConfig,
    ) -> Self {
        let cluster = ClusterClient::new(client.clone(), cluster_id);
        Self {
            client,
            cluster,
            config,
        }
    }

    pub async fn run(
        &self,
        mode: ReloadMode,
        worker_id: Option<&str>,
    ) -> Result<ModuleResult<ReloadReport>> {
        info!(
            "Node operation: {} on cluster {}",
            mode,
            self.cluster.cluster_id()
        );

        let mut report = ReloadReport::new(mode);
        match mode {
            ReloadMode::List => report.worker_nodes = Some(self.list_workers().await?),
            ReloadMode::Single => {
                let worker_id = worker_id.ok_or_else(|| {
                    Error::config("--worker-id is required for a single node reload")
                })?;
                report.reloads.push(self.reload(worker_id).await);
            }
            ReloadMode::Simultaneous => report.reloads = self.reload_simultaneous().await?,
            ReloadMode::Sequential => self.reload_sequential(&mut report).await?,
        }

        if report.succeeded() {
            let changed = !report.reloads.is_empty();
            Ok(ModuleResult::exit(changed, report))
        } else {
            Ok(ModuleResult::fail("Error reloading worker nodes", report))
        }
    }

    /// Current worker nodes of the cluster
    pub async fn list_workers(&self) -> Result<Vec<WorkerNode>> {
        let payload = self.cluster.list_worker_nodes().await?.into_result()?;
        serde_json::from_value(payload).map_err(|source| Error::Decode {
            operation: "list_worker_nodes",
            source,
        })
    }

    /// Whether `worker_id` is listed with status Ready
    pub async fn is_worker_ready(&self, worker_id: &str) -> Result<bool> {
        let workers = self.list_workers().await?;
        Ok(workers.iter().any(|w| w.id == worker_id && w.is_ready()))
    }

    /// Issue one forced reload; a request that got no answer is recorded
    /// as not accepted
    async fn reload(&self, worker_id: &str) -> WorkerReload {
        info!(
            "Reloading node {} in cluster {}",
            worker_id,
            self.cluster.cluster_id()
        );
        let worker = WorkerClient::new(self.client.clone(), self.cluster.cluster_id(), worker_id);
        match worker.update_node(&WorkerCommand::forced_reload()).await {
            Ok(result) => {
                info!("Status = {}", result.outcome());
                WorkerReload::from_call(worker_id, result)
            }
            Err(e) => {
                warn!("Reload of {} failed: {}", worker_id, e);
                WorkerReload::from_error(worker_id, &e)
            }
        }
    }

    async fn reload_simultaneous(&self) -> Result<Vec<WorkerReload>> {
        let workers = self.list_workers().await?;
        info!("Number of worker nodes = {}", workers.len());

        Ok(join_all(workers.iter().map(|w| self.reload(&w.id))).await)
    }

    /// Reload workers one by one, waiting for each to be Ready again.
    ///
    /// Stops at the first rejected reload, or at the first worker that does
    /// not come back; reloads issued so far stay in `report`.
    async fn reload_sequential(&self, report: &mut ReloadReport) -> Result<()> {
        let workers = self.list_workers().await?;
        info!("Number of worker nodes = {}", workers.len());

        for worker in &workers {
            let reload = self.reload(&worker.id).await;
            let accepted = reload.accepted;
            report.reloads.push(reload);

            if !accepted {
                warn!("Reload of {} was rejected, stopping", worker.id);
                break;
            }

            let ready = PollingConfig::new(
                self.config.timeout_secs,
                self.config.poll_interval_secs,
                format!("Waiting for node {} to become Ready", worker.id),
            )
            .with_initial_delay(self.config.initial_delay_secs)
            .poll_until(|| self.is_worker_ready(&worker.id))
            .await;

            if let Err(e) = ready {
                warn!("Stopping sequential reload: {}", e);
                report.error = Some(e.to_string());
                break;
            }
        }

        Ok(())
    }
}
