//! Command-line interface for telebench.
//!
//! Wires configuration loading, logging, the OTLP export pipeline, and
//! shutdown handling around the generator. Configuration precedence:
//! CLI arguments, then the YAML config file, then defaults.

use crate::core::{ConfigBuilder, GeneratorConfig, Result, TelebenchError};
use crate::generator::Generator;
use crate::runtime::{otel, RecordingRuntime};
use clap::Parser;
use opentelemetry::metrics::MeterProvider as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Synthetic OTEL metrics load generator with configurable cardinality churn.
#[derive(Parser, Debug)]
#[command(name = "telebench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// OTLP gRPC collector endpoint
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://127.0.0.1:4317"
    )]
    pub endpoint: String,

    /// Collect and push values every N seconds
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    pub export_interval: u64,

    /// Metric name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Number of metrics to serve
    #[arg(long)]
    pub metric_count: Option<usize>,

    /// Number of labels per metric
    #[arg(long)]
    pub label_count: Option<usize>,

    /// Number of series per metric
    #[arg(long)]
    pub series_count: Option<usize>,

    /// Length of the metric name padding token
    #[arg(long = "metricname-length")]
    pub metric_name_length: Option<usize>,

    /// Length of the label name padding token
    #[arg(long = "labelname-length")]
    pub label_name_length: Option<usize>,

    /// Change the cycle_id label value every N seconds
    #[arg(long, value_name = "SECONDS")]
    pub series_interval: Option<u64>,

    /// Advance the metric cycle counter every N seconds
    #[arg(long, value_name = "SECONDS")]
    pub metric_interval: Option<u64>,

    /// Constant label to add to every series, in labelName=labelValue format.
    /// Can be specified multiple times.
    #[arg(long = "const-label")]
    pub const_labels: Vec<String>,

    /// Configuration file path (YAML)
    #[arg(short, long, env = "TELEBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Generate without exporting; log collection pass sizes instead
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, env = "TELEBENCH_DEBUG")]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Load configuration with CLI > config file > defaults precedence.
    pub async fn load_config(&self) -> Result<GeneratorConfig> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = &self.config {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                TelebenchError::config(format!("Failed to read config file {:?}: {}", path, e))
            })?;
            builder = builder.from_yaml(&content)?;
            tracing::info!("Loaded configuration from: {:?}", path);
        }

        self.apply_overrides(builder)
    }

    fn apply_overrides(&self, mut builder: ConfigBuilder) -> Result<GeneratorConfig> {
        if let Some(prefix) = &self.prefix {
            builder = builder.prefix(prefix.clone());
        }
        if let Some(count) = self.metric_count {
            builder = builder.metric_count(count);
        }
        if let Some(count) = self.label_count {
            builder = builder.label_count(count);
        }
        if let Some(count) = self.series_count {
            builder = builder.series_count(count);
        }
        if let Some(length) = self.metric_name_length {
            builder = builder.metric_name_length(length);
        }
        if let Some(length) = self.label_name_length {
            builder = builder.label_name_length(length);
        }
        if let Some(secs) = self.series_interval {
            builder = builder.series_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = self.metric_interval {
            builder = builder.metric_interval(Duration::from_secs(secs));
        }
        for label in &self.const_labels {
            builder = builder.const_label(label.clone());
        }

        builder.build()
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let default_level = if self.debug { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .try_init()
            .map_err(|e| TelebenchError::config(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }
}

/// Execute the load generator until interrupted.
pub async fn execute(cli: Cli) -> Result<()> {
    cli.init_logging()?;

    let config = cli.load_config().await?;
    let generator = Generator::new(config)?;
    tracing::info!(
        metrics = generator.config().metric_count,
        series_per_metric = generator.config().series_count,
        cardinality = generator.config().cardinality(),
        "starting load generator"
    );

    let export_interval = Duration::from_secs(cli.export_interval);
    if cli.dry_run {
        run_dry(&generator, export_interval).await
    } else {
        run_exporting(&generator, &cli.endpoint, export_interval).await
    }
}

/// Run against a real OTLP collector.
async fn run_exporting(
    generator: &Generator,
    endpoint: &str,
    export_interval: Duration,
) -> Result<()> {
    let provider = otel::install_pipeline(endpoint, export_interval)?;
    let meter = provider.meter("telebench");
    tracing::info!(endpoint, "exporting to OTLP collector");

    generator.run(&meter, shutdown_signal()).await?;

    provider
        .shutdown()
        .map_err(|e| TelebenchError::export(format!("shutdown meter provider: {}", e)))
}

/// Run against the in-memory runtime, emulating the collector's pull schedule.
async fn run_dry(generator: &Generator, export_interval: Duration) -> Result<()> {
    tracing::info!("dry-run mode: observations are counted, not exported");
    let runtime = Arc::new(RecordingRuntime::new());

    let collector = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(export_interval);
            tick.tick().await;
            loop {
                tick.tick().await;
                let observations = runtime.collect();
                tracing::info!(observations = observations.len(), "dry-run collection pass");
            }
        })
    };

    let result = generator.run(&*runtime, shutdown_signal()).await;
    collector.abort();
    result
}

/// Resolves when the process receives an interrupt signal.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            endpoint: "http://127.0.0.1:4317".to_string(),
            export_interval: 30,
            prefix: None,
            metric_count: None,
            label_count: None,
            series_count: None,
            metric_name_length: None,
            label_name_length: None,
            series_interval: None,
            metric_interval: None,
            const_labels: Vec::new(),
            config: None,
            dry_run: false,
            debug: false,
        }
    }

    #[test]
    fn test_defaults_pass_through() {
        let config = bare_cli().apply_overrides(ConfigBuilder::new()).unwrap();
        assert_eq!(config.metric_count, 500);
        assert_eq!(config.prefix, "telebench");
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut cli = bare_cli();
        cli.metric_count = Some(2);
        cli.series_interval = Some(5);
        cli.const_labels = vec!["env=test".to_string()];

        let config = cli.apply_overrides(ConfigBuilder::new()).unwrap();
        assert_eq!(config.metric_count, 2);
        assert_eq!(config.series_interval, Duration::from_secs(5));
        assert_eq!(config.const_labels, vec!["env=test".to_string()]);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut cli = bare_cli();
        cli.series_count = Some(0);
        assert!(cli.apply_overrides(ConfigBuilder::new()).is_err());
    }
}
