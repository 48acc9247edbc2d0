//! Synthetic series generator.
//!
//! Fabricates `metric_count × series_count` time series behind a single
//! pull-based sampling callback while two decoupled clocks churn the cycle
//! counters that feed metric names and the `cycle_id` label. The sampling
//! callback is invoked by the external runtime's own scheduler, concurrently
//! with the churn clocks, so the series cycle is read with a single atomic
//! snapshot per pass and never re-read mid-pass.

pub mod labels;
pub mod namer;

use crate::core::{GeneratorConfig, Result};
use crate::runtime::{MetricsRuntime, SampleObserver};
use opentelemetry::KeyValue;
use rand::{thread_rng, Rng};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval_at, Instant as TokioInstant, MissedTickBehavior};

/// Description attached to every generated gauge.
const GAUGE_DESCRIPTION: &str = "A tasty metric morsel";

/// Cycle counters shared between the churn clocks and the sampling callback.
///
/// Owned by the generator instance, never process-global. Created at zero and
/// never reset except by restarting the process. The series cycle is the only
/// counter touched concurrently (churn clock writes, sampling callback reads);
/// the metric cycle is only read at registration time, before the clocks
/// start, but is kept atomic so the whole struct is uniformly `Sync`.
#[derive(Debug, Default)]
pub struct GeneratorState {
    series_cycle: AtomicU64,
    metric_cycle: AtomicU64,
}

impl GeneratorState {
    /// Current series cycle value.
    pub fn series_cycle(&self) -> u64 {
        self.series_cycle.load(Ordering::Relaxed)
    }

    /// Current metric cycle value.
    pub fn metric_cycle(&self) -> u64 {
        self.metric_cycle.load(Ordering::Relaxed)
    }

    fn advance_series_cycle(&self) -> u64 {
        self.series_cycle.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn advance_metric_cycle(&self) -> u64 {
        self.metric_cycle.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Synthetic telemetry load generator.
///
/// Construction validates the configuration and builds the immutable base
/// label set; [`Generator::run`] registers the instruments and drives the
/// churn clocks until the shutdown future resolves.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    labels: Arc<Vec<KeyValue>>,
    state: Arc<GeneratorState>,
}

impl Generator {
    /// Create a generator from a configuration.
    ///
    /// Fails with a configuration error before any background work starts if
    /// the configuration is invalid or a constant label is malformed.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let labels = labels::base_labels(&config)?;
        Ok(Generator {
            config,
            labels: Arc::new(labels),
            state: Arc::new(GeneratorState::default()),
        })
    }

    /// The immutable base label set (generated labels then constant labels).
    pub fn base_labels(&self) -> &[KeyValue] {
        &self.labels
    }

    /// Current series cycle value.
    pub fn series_cycle(&self) -> u64 {
        self.state.series_cycle()
    }

    /// Current metric cycle value.
    pub fn metric_cycle(&self) -> u64 {
        self.state.metric_cycle()
    }

    /// The configuration this generator was built from.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Register all gauges plus the single sampling callback with `runtime`.
    ///
    /// Gauge names are derived from the metric cycle value at call time. The
    /// callback is only registered once every gauge exists, so the runtime
    /// never observes a partial handle set; any failure aborts with a
    /// registration error and no callback registered.
    pub fn register_metrics<R: MetricsRuntime>(&self, runtime: &R) -> Result<Vec<R::Handle>> {
        let cycle = self.state.metric_cycle();
        let mut handles = Vec::with_capacity(self.config.metric_count);
        for idx in 0..self.config.metric_count {
            let name = namer::metric_name(
                &self.config.prefix,
                self.config.metric_name_length,
                cycle,
                idx,
            );
            handles.push(runtime.create_gauge(&name, GAUGE_DESCRIPTION)?);
        }

        let state = Arc::clone(&self.state);
        let base_labels = Arc::clone(&self.labels);
        let series_count = self.config.series_count;
        let callback_handles = handles.clone();
        runtime.register_sampling_callback(
            &handles,
            Box::new(move |observer| {
                sampling_pass(observer, &callback_handles, &state, &base_labels, series_count);
            }),
        )?;

        tracing::info!(
            metrics = handles.len(),
            series_per_metric = series_count,
            cycle,
            "registered gauges and sampling callback"
        );
        Ok(handles)
    }

    /// Register the instruments and run the churn clocks until `shutdown`
    /// resolves.
    ///
    /// Returns `Ok(())` on clean cancellation; in-flight sampling passes are
    /// the runtime's concern and are not drained.
    pub async fn run<R, F>(&self, runtime: &R, shutdown: F) -> Result<()>
    where
        R: MetricsRuntime,
        F: Future<Output = ()>,
    {
        self.register_metrics(runtime)?;

        // First tick one full period after start, and drop ticks missed while
        // the loop was busy, matching ticker semantics.
        let mut series_tick = interval_at(
            TokioInstant::now() + self.config.series_interval,
            self.config.series_interval,
        );
        series_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut metric_tick = interval_at(
            TokioInstant::now() + self.config.metric_interval,
            self.config.metric_interval,
        );
        metric_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = series_tick.tick() => {
                    let cycle = self.state.advance_series_cycle();
                    tracing::info!(cycle, "refreshing series cycle");
                }
                _ = metric_tick.tick() => {
                    // TODO: swap in a freshly registered handle set here so the
                    // new cycle's metric names actually go live; today only the
                    // counter advances.
                    let cycle = self.state.advance_metric_cycle();
                    tracing::info!(cycle, "refreshing metric cycle");
                }
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received, stopping churn clocks");
                    return Ok(());
                }
            }
        }
    }
}

/// One collection pass: every handle × every series index.
///
/// The series cycle is snapshotted exactly once so every observation in the
/// pass carries the same `cycle_id`, even if a churn tick lands mid-pass.
fn sampling_pass<H>(
    observer: &dyn SampleObserver<H>,
    handles: &[H],
    state: &GeneratorState,
    base_labels: &[KeyValue],
    series_count: usize,
) {
    let started = Instant::now();
    let cycle_id = state.series_cycle().to_string();
    let mut rng = thread_rng();

    for handle in handles {
        for idx in 0..series_count {
            let mut series = Vec::with_capacity(base_labels.len() + 2);
            series.extend(base_labels.iter().cloned());
            series.push(KeyValue::new("series_id", idx.to_string()));
            series.push(KeyValue::new("cycle_id", cycle_id.clone()));
            observer.observe(handle, f64::from(rng.gen_range(0..100_i32)), &series);
        }
    }

    tracing::debug!(
        observations = handles.len() * series_count,
        elapsed = ?started.elapsed(),
        "sampling pass complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigBuilder;
    use crate::runtime::recording::{ObservationSink, RecordingHandle, RecordingRuntime};
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn small_config() -> GeneratorConfig {
        ConfigBuilder::new()
            .prefix("demo")
            .metric_count(2)
            .label_count(1)
            .series_count(2)
            .metric_name_length(1)
            .label_name_length(1)
            .const_label("env=test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_registration_creates_all_gauges_then_callback() {
        let generator = Generator::new(small_config()).unwrap();
        let runtime = RecordingRuntime::new();
        let handles = generator.register_metrics(&runtime).unwrap();

        assert_eq!(handles.len(), 2);
        assert_eq!(runtime.gauge_names(), vec!["demo_metric_m_0_0", "demo_metric_m_0_1"]);
        assert_eq!(
            runtime.gauge_descriptions(),
            vec![GAUGE_DESCRIPTION, GAUGE_DESCRIPTION]
        );
        assert!(runtime.has_callback());
    }

    #[test]
    fn test_sampling_pass_emits_full_cardinality() {
        let generator = Generator::new(small_config()).unwrap();
        let runtime = RecordingRuntime::new();
        generator.register_metrics(&runtime).unwrap();

        let observations = runtime.collect();
        assert_eq!(observations.len(), 4);

        let series_ids: HashSet<_> = observations
            .iter()
            .map(|o| o.label("series_id").unwrap())
            .collect();
        assert_eq!(series_ids, HashSet::from(["0".to_string(), "1".to_string()]));

        for observation in &observations {
            assert_eq!(observation.label("cycle_id").as_deref(), Some("0"));
            assert_eq!(observation.label("env").as_deref(), Some("test"));
            assert_eq!(observation.label("label_key_k_0").as_deref(), Some("label_val_v_0"));
            assert!((0.0..100.0).contains(&observation.value));
        }
    }

    #[test]
    fn test_cycle_id_snapshot_survives_mid_pass_churn() {
        let generator = Generator::new(small_config()).unwrap();
        let runtime = RecordingRuntime::new();
        generator.register_metrics(&runtime).unwrap();

        // Bump the series cycle after every observation; the pass must keep
        // the cycle_id it snapshotted at entry.
        struct ChurningObserver {
            state: Arc<GeneratorState>,
            cycle_ids: Mutex<Vec<String>>,
        }
        impl SampleObserver<RecordingHandle> for ChurningObserver {
            fn observe(&self, _handle: &RecordingHandle, _value: f64, labels: &[KeyValue]) {
                let cycle_id = labels
                    .iter()
                    .find(|kv| kv.key.as_str() == "cycle_id")
                    .map(|kv| kv.value.to_string())
                    .unwrap();
                self.cycle_ids.lock().unwrap().push(cycle_id);
                self.state.advance_series_cycle();
            }
        }

        let observer = ChurningObserver {
            state: Arc::clone(&generator.state),
            cycle_ids: Mutex::new(Vec::new()),
        };
        runtime.run_callback(&observer);

        let cycle_ids = observer.cycle_ids.into_inner().unwrap();
        assert_eq!(cycle_ids.len(), 4);
        assert!(cycle_ids.iter().all(|c| c == "0"));
        // The churn itself was applied four times.
        assert_eq!(generator.series_cycle(), 4);

        // The next pass snapshots the advanced value.
        let sink = ObservationSink::default();
        runtime.run_callback(&sink);
        let observations = sink.into_observations();
        assert!(observations.iter().all(|o| o.label("cycle_id").as_deref() == Some("4")));
    }

    #[test]
    fn test_gauge_creation_failure_registers_no_callback() {
        let generator = Generator::new(small_config()).unwrap();
        let runtime = RecordingRuntime::new();
        runtime.fail_create_gauge(true);

        let err = generator.register_metrics(&runtime).unwrap_err();
        assert_eq!(err.category(), "registration");
        assert!(!runtime.has_callback());
    }

    #[test]
    fn test_malformed_const_label_fails_construction() {
        let config = ConfigBuilder::new().const_label("badformat").build().unwrap();
        let err = Generator::new(config).unwrap_err();
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("badformat"));
    }
}
