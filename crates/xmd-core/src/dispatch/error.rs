//! Dispatcher error type.

use super::policy::ErrorKind;

/// Error returned by the dispatcher or a transport.
///
/// HTTP error statuses are not errors: they arrive as a `Response`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The transport failed before producing a response.
    #[error("{message}")]
    Transport { kind: ErrorKind, message: String },
    /// The scheduler task went away before replying.
    #[error("dispatcher stopped before the request completed")]
    DispatcherClosed,
}

impl FetchError {
    pub fn transport(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Retry classification; anything but a transport failure is final.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { kind, .. } => *kind,
            Self::DispatcherClosed => ErrorKind::Other,
        }
    }
}
