/// Cluster info module: cluster details, pools, workers, ALBs and bound services
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::report::ModuleResult;
use crate::error::{Result, UpstreamError};
use crate::iks::{AlbType, CallResult, ClusterClient};

/// Options of the cluster info module
#[derive(Debug, Clone)]
pub struct ClusterInfoParams {
    pub alb_type: AlbType,
    pub list_bound_services: bool,
}

impl Default for ClusterInfoParams {
    fn default() -> Self {
        Self {
            alb_type: AlbType::All,
            list_bound_services: true,
        }
    }
}

/// Aggregated cluster info, printed in this field order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterInfo {
    pub cluster_info: Value,
    pub worker_pools: Value,
    pub worker_nodes: Value,
    pub ingress_albs: Value,
    pub list_bounded_services: Value,
}

/// Collects call payloads and upstream failures in call order
#[derive(Default)]
struct Aggregate {
    failures: Vec<UpstreamError>,
}

impl Aggregate {
    fn take(&mut self, result: CallResult) -> Value {
        match result.into_result() {
            Ok(payload) => payload,
            Err(err) => {
                warn!("{}", err);
                let payload = err.payload.clone();
                self.failures.push(err);
                payload
            }
        }
    }
}

/// Fetch everything the module reports about a cluster.
///
/// The calls are independent and issued concurrently. Transport errors
/// abort the run; upstream failures are collected and turn the result into
/// a failure that still carries every payload.
pub async fn cluster_info(
    cluster: &ClusterClient,
    params: &ClusterInfoParams,
) -> Result<ModuleResult<ClusterInfo>> {
    info!("Collecting info for cluster {}", cluster.cluster_id());

    let services = async {
        if params.list_bound_services {
            cluster.list_bound_services().await.map(Some)
        } else {
            Ok(None)
        }
    };

    let (basic, pools, nodes, albs, services) = tokio::join!(
        cluster.basic_info(),
        cluster.list_worker_pools(),
        cluster.list_worker_nodes(),
        cluster.list_albs(),
        services,
    );

    let (basic, pools, nodes, albs, services) = (basic?, pools?, nodes?, albs?, services?);

    let mut aggregate = Aggregate::default();
    let report = ClusterInfo {
        cluster_info: aggregate.take(basic),
        worker_pools: aggregate.take(pools),
        worker_nodes: aggregate.take(nodes),
        ingress_albs: params.alb_type.filter(aggregate.take(albs)),
        list_bounded_services: services
            .map(|result| aggregate.take(result))
            .unwrap_or(Value::Null),
    };

    if aggregate.failures.is_empty() {
        Ok(ModuleResult::exit(true, report))
    } else {
        Ok(ModuleResult::fail(
            "Error listing cluster info",
            json!({
                "failures": aggregate.failures,
                "partial": report,
            }),
        ))
    }
}
