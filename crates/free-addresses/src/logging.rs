//! Logging setup
//!
//! stdout and stderr belong to the probe's result, so by default events go
//! only to the text log file and the journal. Filter comes from `RUST_LOG`
//! (default `info`).

use anyhow::Result;
use std::fs::{self, OpenOptions};
use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LoggingArgs};

const PROGRAM: &str = "free_addresses";

type Base = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Keeps the non-blocking file writer alive; dropping it flushes the log
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

/// Open the text log file; `None` if it cannot be created
fn file_writer(args: &LoggingArgs) -> Option<fs::File> {
    if let Some(dir) = args.log_file.parent() {
        if !dir.as_os_str().is_empty() && fs::create_dir_all(dir).is_err() {
            return None;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .ok()
}

/// Install the global subscriber
///
/// An unwritable log file drops the file sink silently: writing the failure
/// to stderr would corrupt the relayed result.
pub fn init(args: &LoggingArgs) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    if args.text_logging {
        if let Some(file) = file_writer(args) {
            let (writer, guard) = tracing_appender::non_blocking(file);
            layers.push(format_layer(args.log_format, writer, false));
            file_guard = Some(guard);
        }
    }

    if args.journal_logging {
        // No journald socket (containers, CI): drop the sink like an unwritable file
        if let Ok(journal) = tracing_journald::layer() {
            layers.push(journal.with_syslog_identifier(PROGRAM.to_string()).boxed());
        }
    }

    if args.stderr_logging {
        layers.push(format_layer(args.log_format, std::io::stderr, true));
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    Ok(LoggingGuard { _file: file_guard })
}

/// Span every probe event is recorded under
pub fn root_span(host_id: Option<&str>) -> Span {
    match host_id {
        Some(id) => tracing::info_span!(PROGRAM, host_id = %id),
        None => tracing::info_span!(PROGRAM),
    }
}
