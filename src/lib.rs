/// iksctl - IBM Cloud Kubernetes Service automation
///
/// Typed clients for the IAM token endpoint and the container-service API,
/// and the automation modules (cluster info, worker info, worker update,
/// node reload) built on them.
pub mod config;
pub mod error;
pub mod iam;
pub mod iks;
pub mod ops;
pub mod utils;

pub use error::{Error, Result, UpstreamError};
