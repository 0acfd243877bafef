/// Automation modules built on the IAM and container-service clients
pub mod cluster_info;
pub mod node_reload;
pub mod report;
pub mod worker;

pub use cluster_info::{cluster_info, ClusterInfo, ClusterInfoParams};
pub use node_reload::{NodeReloader, ReloadMode, ReloadReport};
pub use report::ModuleResult;
pub use worker::{update_worker, worker_info, WorkerInfo, WorkerUpdate};

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::iam::{ApiKey, BearerToken, TokenProvider};
use crate::iks::ContainerServiceClient;

/// How an invocation authenticates
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Exchange this API key for a token
    ApiKey(ApiKey),
    /// Use an already issued IAM token as-is
    Token(BearerToken),
}

impl Credentials {
    /// Obtain the bearer token for this invocation
    pub async fn token(&self, config: &Config) -> Result<BearerToken> {
        match self {
            Credentials::ApiKey(key) => {
                TokenProvider::new(&config.endpoints.iam_url, config.http_timeout())?
                    .exchange(key)
                    .await
            }
            Credentials::Token(token) => {
                debug!("Using pre-issued IAM token");
                Ok(token.clone())
            }
        }
    }
}

/// Authenticate and build a container-service client
pub async fn connect(config: &Config, credentials: &Credentials) -> Result<ContainerServiceClient> {
    let token = credentials.token(config).await?;
    ContainerServiceClient::new(
        &config.endpoints.containers_url,
        &token,
        config.http_timeout(),
    )
}
