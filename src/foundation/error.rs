use crate::spec::source::ResourceId;

/// Convenience result type used across the crate.
pub type LottieResult<T> = Result<T, LottieError>;

/// Failure taxonomy surfaced by composition loading.
///
/// Building a [`crate::CompositionSpec`] never fails; every variant here originates in the loader
/// or in composition parsing.
#[derive(thiserror::Error, Debug)]
pub enum LottieError {
    /// Invalid user-provided or composition data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed composition document.
    #[error("parse error: {0}")]
    Parse(String),

    /// No bundled resource is registered under the requested id.
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),

    /// A file or asset does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The process may not read the requested location.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The remote server answered with a non-success status.
    #[error("http status {status} for '{url}'")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Transport-level failure while fetching a remote composition.
    #[error("network error: {0}")]
    Network(String),

    /// No content resolver could open the URI.
    #[error("unresolvable uri: {0}")]
    UnresolvableUri(String),

    /// Recognized input that this crate does not handle.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LottieError {
    /// Build a [`LottieError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LottieError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`LottieError::Network`] value.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Build a [`LottieError::UnresolvableUri`] value.
    pub fn unresolvable_uri(uri: impl Into<String>) -> Self {
        Self::UnresolvableUri(uri.into())
    }

    /// Build a [`LottieError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Classify an IO error raised while reading `location`.
    pub fn from_io(err: std::io::Error, location: impl Into<String>) -> Self {
        let location = location.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(location),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(location),
            _ => Self::Other(anyhow::Error::new(err).context(format!("read '{location}'"))),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for LottieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
