/// IBM Cloud Kubernetes Service API client
use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::models::CallResult;
use crate::error::{Error, Result};
use crate::iam::BearerToken;

pub const IKS_API_BASE: &str = "https://containers.cloud.ibm.com/global/";

/// Header scoping a request to a resource group
pub const RESOURCE_GROUP_HEADER: &str = "X-Auth-Resource-Group";

/// Low-level container-service client shared by the cluster and worker facades
#[derive(Clone)]
pub struct ContainerServiceClient {
    client: Client,
    base_url: String,
}

impl ContainerServiceClient {
    /// Create a client that presents `token` on every request
    pub fn new(base_url: impl Into<String>, token: &BearerToken, timeout: Duration) -> Result<Self> {
        let mut auth = header::HeaderValue::from_str(token.as_str())
            .map_err(|_| Error::config("IAM token contains invalid header characters"))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL for an API path.
    ///
    /// Identifiers are substituted verbatim by the callers; nothing is
    /// percent-encoded here.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request to the API, scoped to `resource_group` if given
    pub(crate) async fn get(
        &self,
        operation: &'static str,
        path: &str,
        resource_group: Option<&str>,
    ) -> Result<CallResult> {
        let url = self.url(path);
        debug!("GET {}", url);

        let request = scoped(self.client.get(&url), resource_group);
        self.execute(operation, &url, request, None).await
    }

    /// Make a PUT request with a JSON body.
    ///
    /// `success_payload` replaces the response body on 200/204, for endpoints
    /// that answer a successful PUT with nothing.
    pub(crate) async fn put<T: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        body: &T,
        resource_group: Option<&str>,
        success_payload: Option<Value>,
    ) -> Result<CallResult> {
        let url = self.url(path);
        debug!("PUT {}", url);

        let request = scoped(self.client.put(&url).json(body), resource_group);
        self.execute(operation, &url, request, success_payload).await
    }

    async fn execute(
        &self,
        operation: &'static str,
        url: &str,
        request: RequestBuilder,
        success_payload: Option<Value>,
    ) -> Result<CallResult> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(url, e))?;

        debug!("{} returned HTTP {}", operation, status);

        Ok(CallResult::from_response(
            operation,
            status,
            decode_body(&body),
            success_payload,
        ))
    }
}

fn scoped(request: RequestBuilder, resource_group: Option<&str>) -> RequestBuilder {
    match resource_group {
        Some(rg) => request.header(RESOURCE_GROUP_HEADER, rg),
        None => request,
    }
}

/// Decode a response body.
///
/// An empty body becomes `null`; a body that is not JSON (a gateway error
/// page, say) is kept as a string so it can still be surfaced.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
