//! The seam between the generator and the external metrics runtime.
//!
//! The generator only ever needs three things from a telemetry SDK: create an
//! observable gauge, register a single pull callback over a set of gauges, and
//! emit observations from inside that callback. [`MetricsRuntime`] captures
//! exactly that surface so the generator can run against the real
//! OpenTelemetry [`Meter`](opentelemetry::metrics::Meter) or against the
//! in-memory [`RecordingRuntime`](recording::RecordingRuntime) in tests and
//! dry runs.

pub mod otel;
pub mod recording;

use crate::core::Result;
use opentelemetry::KeyValue;

pub use recording::{Observation, RecordingRuntime};

/// A single collection pass handed to the sampling callback.
///
/// Only valid for the duration of one callback invocation; the runtime owns
/// the threading model behind it.
pub trait SampleObserver<H> {
    /// Emit one observation for `handle` with the given value and labels.
    fn observe(&self, handle: &H, value: f64, labels: &[KeyValue]);
}

/// The sampling callback registered with the runtime.
pub type SamplingCallback<H> = Box<dyn Fn(&dyn SampleObserver<H>) + Send + Sync>;

/// Minimal metrics-runtime surface consumed by the generator.
///
/// Both operations are fallible and failures are fatal to generator startup;
/// there is no partial registration (the callback is only registered once
/// every gauge exists).
pub trait MetricsRuntime {
    /// Instrument handle produced by [`MetricsRuntime::create_gauge`].
    type Handle: Clone + Send + Sync + 'static;

    /// Create one observable gauge.
    fn create_gauge(&self, name: &str, description: &str) -> Result<Self::Handle>;

    /// Register the single sampling callback bound to the full handle set.
    fn register_sampling_callback(
        &self,
        handles: &[Self::Handle],
        callback: SamplingCallback<Self::Handle>,
    ) -> Result<()>;
}
