/// HTTP status classification for container-service responses
use serde::{Serialize, Serializer};

/// Semantic outcome of a container-service call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Ok,
    Unauthorized,
    NotFound,
    ServerError,
    Unknown,
}

impl StatusOutcome {
    /// Classify a raw HTTP status code
    pub fn classify(status: u16) -> Self {
        match status {
            200 | 204 => StatusOutcome::Ok,
            401 => StatusOutcome::Unauthorized,
            404 => StatusOutcome::NotFound,
            500 => StatusOutcome::ServerError,
            _ => StatusOutcome::Unknown,
        }
    }

    pub fn is_ok(self) -> bool {
        self == StatusOutcome::Ok
    }

    /// Human-readable message reported alongside failed calls.
    ///
    /// These strings are matched by existing playbooks and must not change.
    pub fn message(self) -> &'static str {
        match self {
            StatusOutcome::Ok => "OK. Request successfully processed",
            StatusOutcome::Unauthorized => "Unauthorized. The IAM token is invalid or expired.",
            StatusOutcome::NotFound => "Not found. The specified cluster could not be found.",
            StatusOutcome::ServerError => {
                "Internal Server Error. IBM Cloud Kubernetes Service is currently unavailable."
            }
            StatusOutcome::Unknown => "ERROR. status_code mismatch",
        }
    }
}

impl From<reqwest::StatusCode> for StatusOutcome {
    fn from(status: reqwest::StatusCode) -> Self {
        Self::classify(status.as_u16())
    }
}

impl std::fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for StatusOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_codes() {
        assert_eq!(StatusOutcome::classify(200), StatusOutcome::Ok);
        assert_eq!(StatusOutcome::classify(204), StatusOutcome::Ok);
        assert_eq!(StatusOutcome::classify(401), StatusOutcome::Unauthorized);
        assert_eq!(StatusOutcome::classify(404), StatusOutcome::NotFound);
        assert_eq!(StatusOutcome::classify(500), StatusOutcome::ServerError);
    }

    #[test]
    fn test_classify_everything_else_is_unknown() {
        for status in [0, 100, 201, 202, 301, 400, 403, 409, 502, 503, u16::MAX] {
            assert_eq!(StatusOutcome::classify(status), StatusOutcome::Unknown);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            StatusOutcome::Ok.to_string(),
            "OK. Request successfully processed"
        );
        assert_eq!(
            StatusOutcome::ServerError.message(),
            "Internal Server Error. IBM Cloud Kubernetes Service is currently unavailable."
        );
        assert_eq!(
            StatusOutcome::Unknown.message(),
            "ERROR. status_code mismatch"
        );
    }

    #[test]
    fn test_from_reqwest_status() {
        assert_eq!(
            StatusOutcome::from(reqwest::StatusCode::NO_CONTENT),
            StatusOutcome::Ok
        );
        assert_eq!(
            StatusOutcome::from(reqwest::StatusCode::FORBIDDEN),
            StatusOutcome::Unknown
        );
    }
}
