// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Errors produced while talking to the hotel backend.
///
/// Every variant carries owned strings so the error can travel inside UI messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(Invalid),

    #[error("no session token available")]
    MissingSession,

    #[error("could not build the request: {0}")]
    Request(String),

    #[error("no response from the server: {0}")]
    NoResponse(String),

    #[error("server error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("request rejected ({status_code}): {}", .message.as_deref().unwrap_or("no message"))]
    Application {
        status_code: i64,
        message: Option<String>,
    },

    #[error("unexpected response status {0}")]
    UnexpectedStatus(u16),

    #[error("could not read the server response: {0}")]
    Decode(String),
}

/// Local precondition failures, detected before anything is sent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    #[error("transaction {0} is not in the current list")]
    UnknownTransaction(i32),

    #[error("transaction {0} is already cancelled")]
    AlreadyCancelled(i32),

    #[error("booking {0} does not belong to this room")]
    UnknownBooking(i32),

    #[error("booking {0} is already checked in")]
    AlreadyCheckedIn(i32),

    #[error("booking {0} is not checked in yet")]
    NotCheckedIn(i32),

    #[error("check-out must not be before check-in")]
    CheckOutBeforeCheckIn,

    #[error("the date is not valid")]
    InvalidDate,

    #[error("another change is still being saved")]
    MutationInProgress,
}

/// How a failure should be reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Checked locally, nothing was sent
    Invalid,
    /// The server answered with an error
    ServerResponded,
    /// The request never got an answer
    NoResponse,
    /// The request could not be built or the answer could not be understood
    RequestFailed,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Validation(_) | ApiError::MissingSession => FailureKind::Invalid,
            ApiError::Server { .. } | ApiError::Application { .. } => FailureKind::ServerResponded,
            ApiError::NoResponse(_) => FailureKind::NoResponse,
            ApiError::Request(_) | ApiError::UnexpectedStatus(_) | ApiError::Decode(_) => {
                FailureKind::RequestFailed
            }
        }
    }

    /// Message sent back by the backend, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } | ApiError::Application { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Request(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_body() {
            // the connection went away while the answer was being read
            ApiError::NoResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Server {
                status: status.as_u16(),
                message: None,
            }
        } else {
            ApiError::NoResponse(err.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_grouped_for_the_user() {
        assert_eq!(
            ApiError::Validation(Invalid::UnknownBooking(3)).kind(),
            FailureKind::Invalid
        );
        assert_eq!(ApiError::MissingSession.kind(), FailureKind::Invalid);
        assert_eq!(
            ApiError::Server {
                status: 500,
                message: None
            }
            .kind(),
            FailureKind::ServerResponded
        );
        assert_eq!(
            ApiError::Application {
                status_code: 404,
                message: Some("not found".into())
            }
            .kind(),
            FailureKind::ServerResponded
        );
        assert_eq!(
            ApiError::NoResponse("connection refused".into()).kind(),
            FailureKind::NoResponse
        );
        assert_eq!(
            ApiError::Request("bad url".into()).kind(),
            FailureKind::RequestFailed
        );
    }

    #[test]
    fn server_message_only_for_server_failures() {
        let err = ApiError::Server {
            status: 422,
            message: Some("Booking is closed".into()),
        };
        assert_eq!(err.server_message(), Some("Booking is closed"));
        assert_eq!(err.to_string(), "server error 422: Booking is closed");
        assert_eq!(ApiError::NoResponse("timeout".into()).server_message(), None);
    }
}
