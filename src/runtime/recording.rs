//! In-memory metrics runtime.
//!
//! Records gauge registrations and observations instead of exporting them.
//! Used by the test suite and by the CLI `--dry-run` mode, where the caller
//! drives collection passes on its own schedule via [`RecordingRuntime::collect`].

use crate::core::{Result, TelebenchError};
use crate::runtime::{MetricsRuntime, SampleObserver, SamplingCallback};
use opentelemetry::KeyValue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Handle to a recorded gauge.
#[derive(Debug, Clone)]
pub struct RecordingHandle {
    name: Arc<str>,
}

impl RecordingHandle {
    /// The gauge name this handle was created with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One recorded observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Name of the gauge that emitted the value.
    pub metric: String,
    /// Observed value.
    pub value: f64,
    /// Full label set in emission order.
    pub labels: Vec<KeyValue>,
}

impl Observation {
    /// Look up a label value by key.
    pub fn label(&self, key: &str) -> Option<String> {
        self.labels
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| kv.value.to_string())
    }
}

/// Metrics runtime that records everything in memory.
#[derive(Default)]
pub struct RecordingRuntime {
    gauges: Mutex<Vec<(String, String)>>,
    callback: Mutex<Option<SamplingCallback<RecordingHandle>>>,
    fail_create: AtomicBool,
    fail_register: AtomicBool,
}

impl RecordingRuntime {
    /// Create an empty recording runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_gauge` calls fail, for error-path tests.
    pub fn fail_create_gauge(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::Relaxed);
    }

    /// Make `register_sampling_callback` fail, for error-path tests.
    pub fn fail_register(&self, fail: bool) {
        self.fail_register.store(fail, Ordering::Relaxed);
    }

    /// Names of all gauges created so far, in creation order.
    pub fn gauge_names(&self) -> Vec<String> {
        self.gauges
            .lock()
            .expect("gauge lock poisoned")
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Descriptions of all gauges created so far, in creation order.
    pub fn gauge_descriptions(&self) -> Vec<String> {
        self.gauges
            .lock()
            .expect("gauge lock poisoned")
            .iter()
            .map(|(_, description)| description.clone())
            .collect()
    }

    /// Whether a sampling callback has been registered.
    pub fn has_callback(&self) -> bool {
        self.callback.lock().expect("callback lock poisoned").is_some()
    }

    /// Run one collection pass and return everything it emitted.
    ///
    /// Returns an empty vec if no callback is registered yet.
    pub fn collect(&self) -> Vec<Observation> {
        let sink = ObservationSink::default();
        self.run_callback(&sink);
        sink.into_observations()
    }

    /// Run the registered callback against a caller-supplied observer.
    ///
    /// Lets tests interleave side effects with individual observations.
    pub fn run_callback(&self, observer: &dyn SampleObserver<RecordingHandle>) {
        let callback = self.callback.lock().expect("callback lock poisoned");
        if let Some(callback) = callback.as_ref() {
            callback(observer);
        }
    }
}

impl MetricsRuntime for RecordingRuntime {
    type Handle = RecordingHandle;

    fn create_gauge(&self, name: &str, description: &str) -> Result<Self::Handle> {
        if self.fail_create.load(Ordering::Relaxed) {
            return Err(TelebenchError::registration(format!(
                "create gauge {}: injected failure",
                name
            )));
        }
        self.gauges
            .lock()
            .expect("gauge lock poisoned")
            .push((name.to_string(), description.to_string()));
        Ok(RecordingHandle {
            name: Arc::from(name),
        })
    }

    fn register_sampling_callback(
        &self,
        _handles: &[Self::Handle],
        callback: SamplingCallback<Self::Handle>,
    ) -> Result<()> {
        if self.fail_register.load(Ordering::Relaxed) {
            return Err(TelebenchError::registration(
                "register callback: injected failure",
            ));
        }
        *self.callback.lock().expect("callback lock poisoned") = Some(callback);
        Ok(())
    }
}

/// Observer that appends every observation to a shared buffer.
#[derive(Default)]
pub struct ObservationSink {
    observations: Mutex<Vec<Observation>>,
}

impl ObservationSink {
    /// Consume the sink, returning the recorded observations.
    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
            .into_inner()
            .expect("observation lock poisoned")
    }
}

impl SampleObserver<RecordingHandle> for ObservationSink {
    fn observe(&self, handle: &RecordingHandle, value: f64, labels: &[KeyValue]) {
        self.observations
            .lock()
            .expect("observation lock poisoned")
            .push(Observation {
                metric: handle.name().to_string(),
                value,
                labels: labels.to_vec(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_gauges_and_observations() {
        let runtime = RecordingRuntime::new();
        let gauge = runtime.create_gauge("g0", "test gauge").unwrap();
        let handles = vec![gauge.clone()];
        runtime
            .register_sampling_callback(
                &handles,
                Box::new(move |observer| {
                    observer.observe(&gauge, 7.0, &[KeyValue::new("series_id", "0")]);
                }),
            )
            .unwrap();

        assert_eq!(runtime.gauge_names(), vec!["g0"]);
        let observations = runtime.collect();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].metric, "g0");
        assert_eq!(observations[0].value, 7.0);
        assert_eq!(observations[0].label("series_id").as_deref(), Some("0"));
    }

    #[test]
    fn test_collect_without_callback_is_empty() {
        let runtime = RecordingRuntime::new();
        assert!(runtime.collect().is_empty());
        assert!(!runtime.has_callback());
    }

    #[test]
    fn test_injected_failures() {
        let runtime = RecordingRuntime::new();
        runtime.fail_create_gauge(true);
        assert!(runtime.create_gauge("g", "d").is_err());

        runtime.fail_create_gauge(false);
        runtime.fail_register(true);
        let gauge = runtime.create_gauge("g", "d").unwrap();
        let err = runtime
            .register_sampling_callback(&[gauge], Box::new(|_| {}))
            .unwrap_err();
        assert_eq!(err.category(), "registration");
    }
}
