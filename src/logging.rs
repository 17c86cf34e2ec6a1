use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Initialize the structured logging system.
///
/// Console output goes to stderr in either text or JSON format; an optional
/// rolling file always logs JSON. The returned guard must be held for the
/// lifetime of the process when file logging is enabled, or buffered lines
/// are lost on exit.
pub fn init_logging(
    log_level: Option<&str>,
    log_file: Option<&Path>,
    json_console: bool,
) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = log_level.unwrap_or("info");
            EnvFilter::try_new(level)
        })
        .map_err(|e| anyhow::anyhow!("Failed to create log filter: {}", e))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!json_console)
        .with_target(true);
    if json_console {
        layers.push(console_layer.json().boxed());
    } else {
        layers.push(console_layer.boxed());
    }

    let guard = if let Some(log_path) = log_file {
        let file_appender = rolling::daily(
            log_path.parent().unwrap_or_else(|| Path::new(".")),
            "cafe-etl.log",
        );
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_target(true)
                .json()
                .boxed(),
        );
        Some(guard)
    } else {
        None
    };

    Registry::default().with(layers).with(env_filter).init();

    info!("Logging system initialized");
    Ok(guard)
}

/// Timing helper for pipeline stages.
pub struct StageTimer {
    stage: &'static str,
    start: Instant,
}

impl StageTimer {
    #[must_use]
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    /// Log the elapsed time and return it.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        info!(
            stage = self.stage,
            duration_ms = duration.as_millis() as u64,
            "Stage completed"
        );
        duration
    }
}
