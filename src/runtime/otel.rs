//! OpenTelemetry-backed metrics runtime.
//!
//! Implements [`MetricsRuntime`] for [`Meter`] so the generator feeds a real
//! SDK, plus the OTLP/gRPC pipeline setup used by the CLI. The generator owns
//! no wire format; everything past the meter is the SDK's concern.

use crate::core::{Result, TelebenchError};
use crate::runtime::{MetricsRuntime, SampleObserver, SamplingCallback};
use opentelemetry::metrics::{Meter, ObservableGauge, Observer};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::Resource;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// Build an OTLP/gRPC meter provider with a periodic reader.
///
/// `export_interval` is the reader period, i.e. how often the sampling
/// callback will be invoked and the observed values pushed to `endpoint`.
pub fn install_pipeline(endpoint: &str, export_interval: Duration) -> Result<SdkMeterProvider> {
    opentelemetry_otlp::new_pipeline()
        .metrics(opentelemetry_sdk::runtime::Tokio)
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_period(export_interval)
        .with_resource(Resource::new(vec![KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_NAME,
            "telebench",
        )]))
        .build()
        .map_err(|e| TelebenchError::export(format!("build OTLP metrics pipeline: {}", e)))
}

/// Adapter handing the SDK's per-collection [`Observer`] to the generator.
struct CollectionPass<'a> {
    observer: &'a dyn Observer,
}

impl SampleObserver<ObservableGauge<f64>> for CollectionPass<'_> {
    fn observe(&self, handle: &ObservableGauge<f64>, value: f64, labels: &[KeyValue]) {
        self.observer.observe_f64(handle, value, labels);
    }
}

impl MetricsRuntime for Meter {
    type Handle = ObservableGauge<f64>;

    fn create_gauge(&self, name: &str, description: &str) -> Result<Self::Handle> {
        self.f64_observable_gauge(name.to_string())
            .with_description(description.to_string())
            .try_init()
            .map_err(|e| TelebenchError::registration(format!("create gauge {}: {}", name, e)))
    }

    fn register_sampling_callback(
        &self,
        handles: &[Self::Handle],
        callback: SamplingCallback<Self::Handle>,
    ) -> Result<()> {
        let instruments: Vec<Arc<dyn Any>> = handles.iter().map(|gauge| gauge.as_any()).collect();
        Meter::register_callback(self, &instruments, move |observer| {
            callback(&CollectionPass { observer });
        })
        // The registration is intentionally leaked: the callback lives for the
        // provider lifetime and is never unregistered.
        .map(drop)
        .map_err(|e| TelebenchError::registration(format!("register callback: {}", e)))
    }
}
