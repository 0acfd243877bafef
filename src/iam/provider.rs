/// IAM token exchange
use std::time::Duration;

use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info};

use super::credentials::{ApiKey, BearerToken};
use crate::error::{Error, Result};

pub const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IamErrorResponse {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

/// Exchanges an API key for an IAM bearer token
#[derive(Clone)]
pub struct TokenProvider {
    client: Client,
    token_url: String,
}

impl TokenProvider {
    pub fn new(token_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token_url: token_url.into(),
        })
    }

    /// Exchange `api_key` for a bearer token with a single POST.
    ///
    /// An empty key is rejected without contacting IAM.
    pub async fn exchange(&self, api_key: &ApiKey) -> Result<BearerToken> {
        if api_key.is_empty() {
            return Err(Error::auth(None, "API key is empty"));
        }

        info!("Requesting IAM token");
        debug!("POST {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("apikey", api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(&self.token_url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(&self.token_url, e))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<IamErrorResponse>(&body) {
                Ok(IamErrorResponse {
                    error_code: Some(code),
                    error_message: Some(message),
                }) => format!("{} - {}", code, message),
                Ok(IamErrorResponse {
                    error_message: Some(message),
                    ..
                }) => message,
                _ => format!("token endpoint returned status {}: {}", status, body),
            };
            return Err(Error::auth(Some(status.as_u16()), message));
        }

        let token = serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|r| r.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::auth(
                    Some(status.as_u16()),
                    "token response is missing access_token",
                )
            })?;

        debug!("IAM token obtained");
        Ok(BearerToken::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_key_rejected_without_request() {
        // Unroutable URL: the request must never be attempted
        let provider = TokenProvider::new("http://0.0.0.0:1/token", Duration::from_secs(1)).unwrap();
        let result = provider.exchange(&ApiKey::new("")).await;

        match result {
            Err(Error::Auth { status, message }) => {
                assert_eq!(status, None);
                assert_eq!(message, "API key is empty");
            }
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_token_response_parsing() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"tok","expires_in":3600}"#).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("tok"));

        let parsed: TokenResponse = serde_json::from_str(r#"{"token_type":"Bearer"}"#).unwrap();
        assert!(parsed.access_token.is_none());
    }
}
