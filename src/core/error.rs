use thiserror::Error;

/// Errors surfaced by the load generator.
///
/// There is deliberately no retry or recovery path: this is a load-generation
/// tool, not a production data path, so every error is fatal to the operation
/// that raised it.
#[derive(Error, Debug)]
pub enum TelebenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Registration error: {0}")]
    Registration(String),

    #[error("Export pipeline error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for telebench operations
pub type Result<T> = std::result::Result<T, TelebenchError>;

impl TelebenchError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new registration error
    pub fn registration<S: Into<String>>(msg: S) -> Self {
        Self::Registration(msg.into())
    }

    /// Creates a new export pipeline error
    pub fn export<S: Into<String>>(msg: S) -> Self {
        Self::Export(msg.into())
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Registration(_) => "registration",
            Self::Export(_) => "export",
            Self::Io(_) => "io",
        }
    }
}
