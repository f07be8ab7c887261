//! Error types

/// Errors raised while building a connection target, connecting, or verifying
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection string could not be parsed
    #[error("invalid connection string: {0}")]
    InvalidUri(String),

    /// Connection attributes are inconsistent
    #[error("invalid connection attributes: {0}")]
    InvalidAttributes(String),

    /// A credential field required by the chosen auth strategy is absent
    #[error("{strategy} authentication requires `{field}`")]
    MissingCredential {
        /// Auth strategy name (as written in attributes)
        strategy: &'static str,
        /// Missing attribute name
        field: &'static str,
    },

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),

    /// Error reported by the MongoDB driver, passed through as-is
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    /// Malformed JSON input
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was raised while building the connection target,
    /// before any connection attempt
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidUri(_)
                | Error::InvalidAttributes(_)
                | Error::MissingCredential { .. }
                | Error::Config(_)
                | Error::Json(_)
        )
    }

    /// Short category label used for metrics
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidUri(_) => "invalid_uri",
            Error::InvalidAttributes(_) => "invalid_attributes",
            Error::MissingCredential { .. } => "missing_credential",
            Error::Config(_) => "config",
            Error::Driver(_) => "driver",
            Error::Json(_) => "json",
            Error::Io(_) => "io",
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
