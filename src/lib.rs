//! Telebench - synthetic OTEL metrics load generator.
//!
//! Telebench fabricates a configurable-cardinality set of time series
//! (metrics × label-sets × series) behind a single pull-based sampling
//! callback, while two decoupled clocks churn label and metric cycle counters
//! to emulate the cardinality growth and rotation patterns seen in production
//! monitoring systems.
//!
//! # Architecture
//!
//! - `core`: configuration and error types
//! - `generator`: label factory, metric namer, churn clocks, sampling callback
//! - `runtime`: the metrics-runtime seam (OpenTelemetry meter or in-memory)
//! - `cli`: command-line interface and OTLP wiring
//!
//! # Example
//!
//! ```no_run
//! use telebench::core::ConfigBuilder;
//! use telebench::runtime::RecordingRuntime;
//! use telebench::Generator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigBuilder::new().metric_count(10).build()?;
//!     let generator = Generator::new(config)?;
//!     let runtime = RecordingRuntime::new();
//!     generator.run(&runtime, tokio::time::sleep(std::time::Duration::from_secs(5))).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod core;
pub mod generator;
pub mod runtime;

// Re-export core types for convenience
pub use crate::core::{GeneratorConfig, Result, TelebenchError};
pub use crate::generator::{Generator, GeneratorState};
