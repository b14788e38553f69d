//! Tracing configuration for SnipDesk
//!
//! ## Behavior / 行为
//!
//! - stderr fmt layer, so command output on stdout stays clean
//! - non-blocking file layer under the log directory
//! - `RUST_LOG` overrides the default directives

use std::path::Path;
use std::{fs, io, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, prelude::*, registry};

const LOG_FILE_NAME: &str = "snipdesk.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives.
///
/// The stderr layer shares the filter with the file layer, so interactive
/// use stays at `warn` for dependencies regardless of build.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        "warn".to_string(),
        format!("snipdesk={level}"),
        format!("sd_app={level}"),
        format!("sd_infra={level}"),
        format!("sd_platform={level}"),
    ]
}

/// Installs the global subscriber.
///
/// `quiet` limits the stderr layer to warnings so one-shot commands do not
/// interleave log lines with their output.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered or `RUST_LOG` holds
/// invalid directives. File logging failures only disable the file layer.
pub fn init_tracing_subscriber(log_dir: &Path, quiet: bool) -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(build_filter_directives(is_development()).join(","))
    });

    let stderr_writer: BoxMakeWriter = if quiet {
        BoxMakeWriter::new(io::stderr.with_max_level(tracing::Level::WARN))
    } else {
        BoxMakeWriter::new(io::stderr)
    };
    let file_writer = match build_file_writer(log_dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
    };

    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stderr_layer);
    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
