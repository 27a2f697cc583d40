use crate::cli::RunArgs;
use crate::config::builder::build_request;
use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dockpp::core::models::result::RunResult;
use dockpp::engine::progress::ProgressReporter;
use dockpp::workflows;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: RunArgs, quiet: bool) -> Result<()> {
    let defaults = DefaultsConfig::default();
    info!("Resolving run request from CLI arguments and defaults...");
    let request = build_request(&args, &defaults)?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the single-pair run workflow...");
    let result = workflows::run::execute(&request, &reporter)?;

    let summary = RunSummary {
        result: &result,
        output_dir: &request.output_dir,
        log_path: request
            .save_log
            .then(|| request.output_dir.join(workflows::run::LOG_FILE_NAME)),
    };
    if !quiet {
        summary.write_streams(&mut io::stdout().lock(), &mut io::stderr().lock())?;
    }
    summary.write_outcome(&mut io::stdout().lock())?;

    Ok(())
}

/// What the user sees once the inference script has exited.
struct RunSummary<'a> {
    result: &'a RunResult,
    output_dir: &'a Path,
    log_path: Option<PathBuf>,
}

impl RunSummary<'_> {
    /// Replays the child's captured output onto the matching streams.
    fn write_streams(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        if !self.result.stdout.is_empty() {
            writeln!(out, "--- inference stdout ---")?;
            write_block(out, &self.result.stdout)?;
        }
        if !self.result.stderr.is_empty() {
            writeln!(err, "--- inference stderr ---")?;
            write_block(err, &self.result.stderr)?;
        }
        Ok(())
    }

    fn write_outcome(&self, out: &mut impl Write) -> io::Result<()> {
        if self.result.success() {
            writeln!(
                out,
                "✓ Inference finished. Output files are in: {}",
                self.output_dir.display()
            )?;
        } else {
            writeln!(
                out,
                "Warning: inference script exited with code {}. Output directory: {}",
                self.result.retcode,
                self.output_dir.display()
            )?;
        }
        if let Some(log_path) = &self.log_path {
            writeln!(out, "  Log written to: {}", log_path.display())?;
        }
        Ok(())
    }
}

fn write_block(w: &mut impl Write, text: &str) -> io::Result<()> {
    w.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}
