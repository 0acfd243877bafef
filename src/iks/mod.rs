/// IBM Cloud Kubernetes Service API client implementation
pub mod client;
pub mod cluster;
pub mod models;
pub mod status;
pub mod worker;

pub use client::ContainerServiceClient;
pub use cluster::ClusterClient;
pub use models::{AlbType, CallResult, WorkerAction, WorkerCommand, WorkerNode};
pub use status::StatusOutcome;
pub use worker::WorkerClient;
