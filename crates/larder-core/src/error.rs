use thiserror::Error;

/// Result type alias for larder operations
pub type Result<T> = std::result::Result<T, LarderError>;

/// Errors that can occur when talking to a Chef Infra Server or
/// assembling reports from its data
#[derive(Error, Debug)]
pub enum LarderError {
    /// Authentication failed - the server rejected the client identity
    #[error("authentication failed: client identity rejected by the server")]
    Unauthorized,

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Node is managed by Policyfile, which capture does not support
    #[error(
        "node '{node}' is managed by Policyfile, which is not supported; \
         only nodes using roles, environments and a run-list can be captured"
    )]
    PolicyfileNode {
        /// Name of the offending node
        node: String,
    },

    /// A fetch of a named server object failed; wraps the underlying error
    /// with the stage being attempted ("unable to retrieve node: X")
    #[error("unable to retrieve {kind} '{name}': {source}")]
    Retrieve {
        /// Kind of object being fetched (node, role, environment, cookbook)
        kind: &'static str,
        /// Name of the object being fetched
        name: String,
        /// Underlying error
        #[source]
        source: Box<LarderError>,
    },

    /// Saving a server object to disk failed
    #[error("unable to save {kind} '{name}': {message}")]
    Save {
        /// Kind of object being persisted
        kind: &'static str,
        /// Name of the object being persisted
        name: String,
        /// What went wrong (directory create, serialize or write stage)
        message: String,
    },

    /// The external static analyzer failed or produced unusable output
    #[error("analyzer failed: {0}")]
    Analyzer(String),

    /// The external static analyzer exceeded its time budget
    #[error("analyzer timed out after {0} seconds")]
    AnalyzerTimeout(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl LarderError {
    /// Wrap an error with the retrieval stage it occurred in.
    #[must_use]
    pub fn retrieve(kind: &'static str, name: impl Into<String>, source: Self) -> Self {
        Self::Retrieve {
            kind,
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if the error is a not-found response from the server
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code if this came from an API response
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
