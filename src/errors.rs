use std::fmt;

/// Errors raised while inspecting the backend.
///
/// Inspection routines return these inside their own outcome; only config
/// loading and the initial connection let one escape to `main`.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Database-related errors.
    Database(sqlx::Error),
    /// Error talking to the HTTP gateway.
    Gateway(String),
    /// Invalid or missing configuration.
    Config(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<DiscoveryError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::Database(e) => write!(f, "{}", e),
            DiscoveryError::Gateway(msg) => write!(f, "{}", msg),
            DiscoveryError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DiscoveryError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Database(e) => Some(e),
            DiscoveryError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DiscoveryError {
    fn from(err: sqlx::Error) -> Self {
        DiscoveryError::Database(err)
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        DiscoveryError::Gateway(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for `DiscoveryError`.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, DiscoveryError>;
}

impl<T> ResultExt<T> for Result<T, DiscoveryError> {
    fn context(self, context: impl Into<String>) -> Result<T, DiscoveryError> {
        self.map_err(|e| DiscoveryError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, DiscoveryError> {
        self.map_err(|e| DiscoveryError::WithContext {
            source: Box::new(DiscoveryError::Database(e)),
            context: context.into(),
        })
    }
}
