use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of the backend or of the transport to it.
///
/// "Not connected yet" and "no data" are not errors; see [`crate::Lookup`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Backend error on '{resource}': {message}")]
    Backend { resource: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid '{resource}' response: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Data source lookup failed: {0}")]
    Registry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub fn backend(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn decode(resource: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            resource: resource.into(),
            source,
        }
    }
}
