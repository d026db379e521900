//! Error types for nexus-retention

use thiserror::Error;

/// Result type alias using nexus-retention's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds raised by the retention engine
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed user input, raised before any network call
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A named repository, task or settings file does not exist
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    /// Transport-level failure talking to the repository manager
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The repository manager answered with a non-2xx status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// A paginated listing sent a cursor it had already sent
    #[error("{url} repeated continuation token '{token}'")]
    RepeatedCursor { url: String, token: String },

    /// A single component could not be deleted
    #[error("Failed to delete component {id}: {message}")]
    Deletion { id: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials file serialisation error
    #[error("Failed to serialise credentials: {0}")]
    Toml(#[from] toml::ser::Error),

    /// YAML settings parse error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// Create a validation error for the given input field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Wrap a transport error with the URL it was raised for
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Create a deletion error
    pub fn deletion(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deletion {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the network layer or the server's answer
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Status { .. } | Self::RepeatedCursor { .. }
        )
    }
}

/// Outcome of a lookup that distinguishes "absent" from "could not ask"
///
/// Callers halt on anything but [`Lookup::Found`]; the split only exists so
/// the reason can be logged precisely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    TransportError(String),
}
