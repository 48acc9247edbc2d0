//! Core configuration and error types for telebench.

#![warn(missing_docs)]

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ConfigBuilder, GeneratorConfig};
pub use error::{Result, TelebenchError};
