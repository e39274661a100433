use thiserror::Error;

/// Failures raised by the builder and the action document layer.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A name, key, pattern or value had the wrong type.
    #[error("{what} should be a {expected}. Received \"{received}\"")]
    InvalidArgument {
        what: &'static str,
        expected: &'static str,
        received: String,
    },

    #[error("Unknown param name. Received \"{0}\"")]
    UnknownParam(String),

    #[error("Unset action param \"{0}\"")]
    MissingValue(String),

    #[error("invalid matcher pattern `{pattern}`")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl BuilderError {
    pub(crate) fn invalid(what: &'static str, expected: &'static str, received: impl Into<String>) -> Self {
        BuilderError::InvalidArgument {
            what,
            expected,
            received: received.into(),
        }
    }
}

pub type Result<T, E = BuilderError> = std::result::Result<T, E>;
