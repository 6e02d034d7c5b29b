use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure reported by the plugin transport for a single native call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The native side received the call and rejected it.
    #[error("{message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },

    /// The call never reached the native side.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            code: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A required argument was missing; no native call was attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The native layer rejected a forwarded call.
    #[error("native call `{method}` failed: {source}")]
    NativeCall {
        method: String,
        #[source]
        source: TransportError,
    },

    #[error("transport unavailable for `{method}`: {reason}")]
    TransportUnavailable { method: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Wrap a transport failure for `method`, keeping rejections verbatim.
    pub fn from_transport(method: &str, err: TransportError) -> Self {
        match err {
            TransportError::Unavailable(reason) => Self::TransportUnavailable {
                method: method.to_string(),
                reason,
            },
            rejected @ TransportError::Rejected { .. } => Self::NativeCall {
                method: method.to_string(),
                source: rejected,
            },
        }
    }

    /// The native rejection message, if this error came from the native side.
    pub fn native_message(&self) -> Option<&str> {
        match self {
            Self::NativeCall {
                source: TransportError::Rejected { message, .. },
                ..
            } => Some(message),
            _ => None,
        }
    }
}
