/// Cluster-level queries
use tracing::info;

use super::client::ContainerServiceClient;
use super::models::CallResult;
use crate::error::Result;

/// Cluster sub-resources reachable with a GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterResource {
    Info,
    Workers,
    WorkerPools,
    Albs,
    Services,
}

impl ClusterResource {
    /// API path for this resource of `cluster_id`
    pub fn path(self, cluster_id: &str) -> String {
        match self {
            ClusterResource::Info => format!("v1/clusters/{}", cluster_id),
            ClusterResource::Workers => format!("v1/clusters/{}/workers", cluster_id),
            ClusterResource::WorkerPools => format!("v1/clusters/{}/workerpools", cluster_id),
            ClusterResource::Albs => format!("v1/alb/clusters/{}", cluster_id),
            ClusterResource::Services => format!("v1/clusters/{}/services", cluster_id),
        }
    }

    pub fn operation(self) -> &'static str {
        match self {
            ClusterResource::Info => "basic_info",
            ClusterResource::Workers => "list_worker_nodes",
            ClusterResource::WorkerPools => "list_worker_pools",
            ClusterResource::Albs => "list_albs",
            ClusterResource::Services => "list_bound_services",
        }
    }
}

/// Queries scoped to one cluster, addressed by name or ID
#[derive(Clone)]
pub struct ClusterClient {
    client: ContainerServiceClient,
    cluster_id: String,
}

impl ClusterClient {
    pub fn new(client: ContainerServiceClient, cluster_id: impl Into<String>) -> Self {
        Self {
            client,
            cluster_id: cluster_id.into(),
        }
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Full URL a query for `resource` is sent to
    pub fn url(&self, resource: ClusterResource) -> String {
        self.client.url(&resource.path(&self.cluster_id))
    }

    async fn fetch(&self, resource: ClusterResource) -> Result<CallResult> {
        self.client
            .get(resource.operation(), &resource.path(&self.cluster_id), None)
            .await
    }

    /// Basic cluster information
    pub async fn basic_info(&self) -> Result<CallResult> {
        info!("Fetching cluster info for {}", self.cluster_id);
        self.fetch(ClusterResource::Info).await
    }

    /// List all worker nodes of the cluster
    pub async fn list_worker_nodes(&self) -> Result<CallResult> {
        self.fetch(ClusterResource::Workers).await
    }

    /// List all worker pools of the cluster
    pub async fn list_worker_pools(&self) -> Result<CallResult> {
        self.fetch(ClusterResource::WorkerPools).await
    }

    /// List all ALBs of the cluster
    pub async fn list_albs(&self) -> Result<CallResult> {
        self.fetch(ClusterResource::Albs).await
    }

    /// List the IBM Cloud services bound in any namespace of the cluster
    pub async fn list_bound_services(&self) -> Result<CallResult> {
        self.fetch(ClusterResource::Services).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iam::BearerToken;
    use crate::iks::client::IKS_API_BASE;
    use std::time::Duration;

    #[test]
    fn test_resource_paths() {
        assert_eq!(ClusterResource::Info.path("c1"), "v1/clusters/c1");
        assert_eq!(ClusterResource::Workers.path("c1"), "v1/clusters/c1/workers");
        assert_eq!(
            ClusterResource::WorkerPools.path("c1"),
            "v1/clusters/c1/workerpools"
        );
        assert_eq!(ClusterResource::Albs.path("c1"), "v1/alb/clusters/c1");
        assert_eq!(
            ClusterResource::Services.path("c1"),
            "v1/clusters/c1/services"
        );
    }

    #[test]
    fn test_url_substitutes_cluster_id_verbatim() {
        let client = ContainerServiceClient::new(
            IKS_API_BASE,
            &BearerToken::new("t"),
            Duration::from_secs(5),
        )
        .unwrap();
        let cluster = ClusterClient::new(client, "my-cluster/ä?");

        assert_eq!(
            cluster.url(ClusterResource::Albs),
            "https://containers.cloud.ibm.com/global/v1/alb/clusters/my-cluster/ä?"
        );
        assert_eq!(cluster.cluster_id(), "my-cluster/ä?");
    }
}
