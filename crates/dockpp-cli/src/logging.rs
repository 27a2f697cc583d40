use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
};

/// The `--log-file` layer always records staging detail, whatever the console shows.
const FILE_LEVEL: LevelFilter = LevelFilter::DEBUG;

/// Console level for the `-v` count; `-q` silences the console entirely.
pub fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: a compact console layer on stderr and, when
/// `log_file` is set, a plain-text layer that keeps a per-run record.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(console_level(verbosity, quiet));

    let subscriber = tracing_subscriber::registry().with(console);
    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            subscriber.with(run_record_layer(file)).init();
        }
        None => subscriber.init(),
    }
    Ok(())
}

/// Each line carries the enclosing `run_workflow{run_id=..}` span, and the span's
/// close event records how long the whole run took.
fn run_record_layer<S>(file: File) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(FILE_LEVEL)
}
