use anyhow::{Context, Result};
use std::path::Path;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// The log sink for one pipeline run.
///
/// Events go to stderr (coloured), to a daily full log and to a daily
/// error-only log under the configured log directory. The file writers are
/// flushed when this value is dropped, so keep it alive until the run ends.
pub struct Telemetry {
    dispatch: Dispatch,
    _guards: [WorkerGuard; 2],
}

impl Telemetry {
    pub fn init(log_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let (full_writer, full_guard) =
            tracing_appender::non_blocking(daily_log(log_dir, "supply_kpi_full_log")?);
        let (error_writer, error_guard) =
            tracing_appender::non_blocking(daily_log(log_dir, "supply_kpi_error_log")?);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(fmt::layer().with_ansi(false).with_writer(full_writer))
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(error_writer.with_max_level(tracing::Level::ERROR)),
            );

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            _guards: [full_guard, error_guard],
        })
    }

    /// Runs `f` with this sink as the current subscriber.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

fn daily_log(log_dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to open {prefix} in {}", log_dir.display()))
}
