/// IBM Cloud IAM authentication
pub mod credentials;
pub mod provider;

pub use credentials::{ApiKey, BearerToken, API_KEY_ENV, IAM_TOKEN_ENV};
pub use provider::{TokenProvider, IAM_TOKEN_URL};
