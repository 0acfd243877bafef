/// API key and bearer token newtypes
use crate::error::{Error, Result};

/// Environment variable the API key falls back to
pub const API_KEY_ENV: &str = "IC_API_KEY";

/// Environment variable holding a pre-fetched IAM token
pub const IAM_TOKEN_ENV: &str = "IC_IAM_TOKEN";

/// Long-lived IBM Cloud API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Pick the API key for this invocation.
    ///
    /// A non-empty explicit key wins. An absent or empty one falls back to
    /// `env_value`, which the caller reads from `IC_API_KEY` once.
    pub fn resolve(explicit: Option<String>, env_value: Option<String>) -> Result<Self> {
        explicit
            .filter(|key| !key.is_empty())
            .or_else(|| env_value.filter(|key| !key.is_empty()))
            .map(Self)
            .ok_or_else(|| {
                Error::auth(
                    None,
                    format!(
                        "API key not found. Pass --api-key or set the {} environment variable",
                        API_KEY_ENV
                    ),
                )
            })
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Short-lived IAM access token, sent as-is in the `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let key = ApiKey::resolve(Some("explicit".to_string()), Some("env".to_string())).unwrap();
        assert_eq!(key.expose(), "explicit");
    }

    #[test]
    fn test_empty_key_falls_back_to_env() {
        let key = ApiKey::resolve(Some(String::new()), Some("env".to_string())).unwrap();
        assert_eq!(key.expose(), "env");

        let key = ApiKey::resolve(None, Some("env".to_string())).unwrap();
        assert_eq!(key.expose(), "env");
    }

    #[test]
    fn test_missing_key_is_auth_error() {
        let result = ApiKey::resolve(Some(String::new()), None);
        assert!(matches!(result, Err(Error::Auth { status: None, .. })));

        let result = ApiKey::resolve(None, Some(String::new()));
        assert!(result.unwrap_err().to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_secrets_are_redacted() {
        assert_eq!(format!("{:?}", ApiKey::new("secret")), "ApiKey(***)");
        assert_eq!(format!("{:?}", BearerToken::new("secret")), "BearerToken(***)");
    }
}
