//! Provider error taxonomy.

use std::fmt;

use thiserror::Error;
use tracing::error;

use holepuncher_proto::v1::LinodeError;

use crate::client::ClientError;

/// Broad category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Decode,
    ProtocolBug,
    Application,
}

/// Ways a well-formed reply can still break the request/reply contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// The reply populated a different result variant (or none).
    UnexpectedResult { got: &'static str },
    /// The expected result carried neither an error nor a success payload.
    EmptyResult,
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedResult { got } => write!(f, "got {got} result"),
            Self::EmptyResult => f.write_str("both result and error objects are empty"),
        }
    }
}

/// One field-level problem reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.reason)
        } else {
            write!(f, "{}: {}", self.field, self.reason)
        }
    }
}

/// What the provider blamed the failure on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Unspecified,
    Single(FieldError),
    Multiple(Vec<FieldError>),
}

/// Normalized error payload of a provider result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFailure {
    pub message: Option<String>,
    pub cause: FailureCause,
}

impl From<LinodeError> for ServerFailure {
    fn from(err: LinodeError) -> Self {
        let message = err
            .error
            .map(|e| e.message)
            .filter(|message| !message.is_empty());
        let mut details: Vec<FieldError> = err
            .details
            .into_iter()
            .map(|d| FieldError {
                field: d.field,
                reason: d.reason,
            })
            .collect();
        let cause = match details.len() {
            0 => FailureCause::Unspecified,
            1 => FailureCause::Single(details.remove(0)),
            _ => FailureCause::Multiple(details),
        };
        Self { message, cause }
    }
}

impl ServerFailure {
    /// Emit one log event per structured component of the failure.
    pub fn report(&self, rpc: &str) {
        if let Some(message) = &self.message {
            error!(rpc, message = %message, "Server error");
        }
        match &self.cause {
            FailureCause::Unspecified => {}
            FailureCause::Single(detail) => {
                error!(rpc, field = %detail.field, reason = %detail.reason, "Error cause");
            }
            FailureCause::Multiple(details) => {
                for (index, detail) in details.iter().enumerate() {
                    error!(
                        rpc,
                        error_number = index + 1,
                        field = %detail.field,
                        reason = %detail.reason,
                        "Multiple errors"
                    );
                }
            }
        }
    }
}

impl fmt::Display for ServerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.as_deref().unwrap_or("unspecified server error");
        match &self.cause {
            FailureCause::Unspecified => f.write_str(message),
            FailureCause::Single(detail) => write!(f, "{message} ({detail})"),
            FailureCause::Multiple(details) => {
                write!(f, "{message} ({} errors)", details.len())
            }
        }
    }
}

/// Provider operation errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("fundamental rpc failure ({rpc}): {source}")]
    Transport {
        rpc: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("{rpc} RPC bug: {violation}")]
    ProtocolBug {
        rpc: &'static str,
        violation: ProtocolViolation,
    },

    #[error("{rpc} failed: {failure}")]
    Application {
        rpc: &'static str,
        failure: ServerFailure,
    },
}

impl ProviderError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Transport {
                source: ClientError::Config(_),
                ..
            } => ErrorKind::Configuration,
            Self::Transport {
                source: ClientError::Decode(_),
                ..
            } => ErrorKind::Decode,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::ProtocolBug { .. } => ErrorKind::ProtocolBug,
            Self::Application { .. } => ErrorKind::Application,
        }
    }

    /// Log the structured parts of an application failure.
    pub fn report(&self) {
        if let Self::Application { rpc, failure } = self {
            failure.report(rpc);
        }
    }
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<holepuncher_core::Error> for ProviderError {
    fn from(err: holepuncher_core::Error) -> Self {
        match err {
            holepuncher_core::Error::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use holepuncher_proto::v1::{LinodeErrorDetail, ServerError};

    use super::*;

    fn detail(field: &str, reason: &str) -> LinodeErrorDetail {
        LinodeErrorDetail {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[test]
    fn no_details_is_unspecified_cause() {
        let failure = ServerFailure::from(LinodeError {
            error: Some(ServerError {
                message: "quota exceeded".into(),
            }),
            details: vec![],
        });
        assert_eq!(failure.message.as_deref(), Some("quota exceeded"));
        assert_eq!(failure.cause, FailureCause::Unspecified);
        assert_eq!(failure.to_string(), "quota exceeded");
    }

    #[test]
    fn single_detail_is_single_cause() {
        let failure = ServerFailure::from(LinodeError {
            error: None,
            details: vec![detail("region", "invalid")],
        });
        assert!(failure.message.is_none());
        assert_eq!(
            failure.cause,
            FailureCause::Single(FieldError {
                field: "region".into(),
                reason: "invalid".into(),
            })
        );
        assert!(failure.to_string().contains("region: invalid"));
    }

    #[test]
    fn several_details_are_kept_in_order() {
        let failure = ServerFailure::from(LinodeError {
            error: Some(ServerError {
                message: "bad request".into(),
            }),
            details: vec![detail("plan", "unknown"), detail("", "token expired")],
        });
        let FailureCause::Multiple(details) = &failure.cause else {
            panic!("expected multiple causes, got {:?}", failure.cause);
        };
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].to_string(), "plan: unknown");
        assert_eq!(details[1].to_string(), "token expired");
        assert_eq!(failure.to_string(), "bad request (2 errors)");
    }

    #[test]
    fn empty_message_counts_as_absent() {
        let failure = ServerFailure::from(LinodeError {
            error: Some(ServerError::default()),
            details: vec![],
        });
        assert!(failure.message.is_none());
    }

    #[test]
    fn kind_separates_decode_from_transport() {
        let decode = ProviderError::Transport {
            rpc: "LinodeListPlans",
            source: ClientError::Decode(holepuncher_crypto::CryptoError::TruncatedFrame {
                expected: 28,
                actual: 3,
            }),
        };
        assert_eq!(decode.kind(), ErrorKind::Decode);

        let rpc = ProviderError::Transport {
            rpc: "LinodeListPlans",
            source: ClientError::Rpc {
                status: 500,
                body: "boom".into(),
            },
        };
        assert_eq!(rpc.kind(), ErrorKind::Transport);
        assert!(rpc.to_string().contains("LinodeListPlans"));
    }

    #[test]
    fn core_config_error_keeps_message() {
        let err = ProviderError::from(holepuncher_core::Error::Config("missing token".into()));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Configuration error: missing token");
    }
}
