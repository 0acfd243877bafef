/// Worker info and worker update modules
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::report::ModuleResult;
use crate::error::Result;
use crate::iks::{WorkerClient, WorkerCommand};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerInfo {
    pub worker_info: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerUpdate {
    pub worker_reload_response: Value,
}

/// Report a single worker node
pub async fn worker_info(worker: &WorkerClient) -> Result<ModuleResult<WorkerInfo>> {
    match worker.basic_info().await?.into_result() {
        Ok(worker_info) => Ok(ModuleResult::exit(true, WorkerInfo { worker_info })),
        Err(err) => {
            warn!("{}", err);
            Ok(ModuleResult::fail("Error listing worker info", err))
        }
    }
}

/// Send a reboot, reload or update command to a worker node
pub async fn update_worker(
    worker: &WorkerClient,
    command: &WorkerCommand,
) -> Result<ModuleResult<WorkerUpdate>> {
    match worker.update_node(command).await?.into_result() {
        Ok(worker_reload_response) => Ok(ModuleResult::exit(
            true,
            WorkerUpdate {
                worker_reload_response,
            },
        )),
        Err(err) => {
            warn!("{}", err);
            Ok(ModuleResult::fail("Error updating worker node", err))
        }
    }
}
