//! Platform error classification
//!
//! Classifies AWS SDK operation errors into a small tagged hierarchy using
//! `ProvideErrorMetadata::code()`, so downstream code matches on variants
//! instead of inspecting raw error codes or Debug strings.

use aws_sdk_ecs::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// ECS error code for server-side failures
const SERVER_EXCEPTION: &str = "ServerException";

/// ECS error code for client-side failures (permissions, malformed requests)
const CLIENT_EXCEPTION: &str = "ClientException";

/// ECS error code for rejected request parameters
const INVALID_PARAMETER_EXCEPTION: &str = "InvalidParameterException";

/// A classified platform error from an AWS service call.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The service itself failed
    #[error("server error: {message}")]
    Server { message: String },

    /// The request was valid but could not be honored for this caller
    #[error("client error: {message}")]
    Client { message: String },

    /// A request parameter was rejected
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Anything else, with the original code when one was present
    #[error("AWS error: {message}")]
    Other {
        code: Option<String>,
        message: String,
    },
}

impl PlatformError {
    /// Classify an SDK operation error at the call boundary.
    pub fn from_sdk<E, R>(err: &SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata,
    {
        let message = err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        classify(err.code(), message)
    }

    /// Build an [`PlatformError::Other`] from loose parts.
    pub fn other(code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Other {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Map an error code to its variant. Unknown and absent codes land in
/// [`PlatformError::Other`] with the code preserved.
pub fn classify(code: Option<&str>, message: String) -> PlatformError {
    match code {
        Some(SERVER_EXCEPTION) => PlatformError::Server { message },
        Some(CLIENT_EXCEPTION) => PlatformError::Client { message },
        Some(INVALID_PARAMETER_EXCEPTION) => PlatformError::InvalidParameter { message },
        _ => PlatformError::Other {
            code: code.map(str::to_string),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_their_variants() {
        assert!(matches!(
            classify(Some("ServerException"), "boom".into()),
            PlatformError::Server { .. }
        ));
        assert!(matches!(
            classify(Some("ClientException"), "denied".into()),
            PlatformError::Client { .. }
        ));
        assert!(matches!(
            classify(Some("InvalidParameterException"), "bad subnet".into()),
            PlatformError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn unknown_code_is_preserved_in_other() {
        let err = classify(Some("ThrottlingException"), "slow down".into());
        match err {
            PlatformError::Other { code, message } => {
                assert_eq!(code.as_deref(), Some("ThrottlingException"));
                assert_eq!(message, "slow down");
            }
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn missing_code_is_other_without_code() {
        let err = classify(None, "connection reset".into());
        assert!(matches!(err, PlatformError::Other { code: None, .. }));
    }

    #[test]
    fn display_keeps_the_message() {
        let err = classify(Some("ServerException"), "internal failure".into());
        assert_eq!(err.to_string(), "server error: internal failure");
    }
}
