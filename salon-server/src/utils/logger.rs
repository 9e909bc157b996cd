//! Logging Infrastructure
//!
//! Features:
//! - Console output, pretty in development and JSON in production
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs (target = "audit")
//! - Permanent security logs (target = "security")

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Application log retention
const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Clean up application log files older than the retention window
///
/// Audit and security logs are never touched.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD (tracing-appender daily naming)
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Run [`cleanup_old_logs`] once a day
async fn periodic_cleanup(log_dir: PathBuf) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
    loop {
        interval.tick().await;
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::warn!(error = %e, "Log cleanup failed");
        }
    }
}

fn file_layer(dir: &Path, prefix: &str, filter: impl Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static) -> anyhow::Result<BoxedLayer> {
    let dir = dir.join(prefix);
    fs::create_dir_all(&dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);

    Ok(fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(appender))
        .with_filter(tracing_subscriber::filter::filter_fn(filter))
        .boxed())
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"); `RUST_LOG` wins when set
/// * `json_format` - JSON console output (production)
/// * `log_dir` - Optional directory for file logging (`app/`, `audit/`, `security/`)
pub fn init_logger_with_file(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let max_level: LevelFilter = level.parse().unwrap_or(LevelFilter::INFO);

    let console_layer: BoxedLayer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(console_filter)
            .boxed()
    };

    let mut layers = vec![console_layer];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        fs::create_dir_all(log_dir)?;

        layers.push(file_layer(log_dir, "app", move |meta| {
            meta.target() != "audit" && meta.target() != "security" && max_level >= *meta.level()
        })?);
        layers.push(file_layer(log_dir, "audit", |meta| meta.target() == "audit")?);
        layers.push(file_layer(log_dir, "security", |meta| meta.target() == "security")?);

        if tokio::runtime::Handle::try_current().is_ok() {
            tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))
}
