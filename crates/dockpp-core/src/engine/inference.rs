use super::error::EngineError;
use crate::core::models::result::RunResult;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const NAME_FLAG: &str = "-n";
pub const OUTPUT_FLAG: &str = "-o";
pub const CONFIG_FLAG: &str = "-c";

/// Launches the external inference script for one staged run.
///
/// The script is called as
/// `[interpreter] <script> -n <run_id> -o <output_dir> -c <config>` and is expected
/// to write its results into `output_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceLauncher {
    script: PathBuf,
    interpreter: Option<String>,
}

impl InferenceLauncher {
    pub fn new(script: impl Into<PathBuf>, interpreter: Option<String>) -> Self {
        Self {
            script: script.into(),
            interpreter,
        }
    }

    /// The executable handed to the OS: the interpreter if one is set, the script otherwise.
    pub fn program(&self) -> OsString {
        match &self.interpreter {
            Some(interpreter) => OsString::from(interpreter),
            None => self.script.clone().into_os_string(),
        }
    }

    pub fn args(&self, run_id: &str, output_dir: &Path, config_path: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(7);
        if self.interpreter.is_some() {
            args.push(self.script.clone().into_os_string());
        }
        args.extend([
            OsString::from(NAME_FLAG),
            OsString::from(run_id),
            OsString::from(OUTPUT_FLAG),
            output_dir.as_os_str().to_os_string(),
            OsString::from(CONFIG_FLAG),
            config_path.as_os_str().to_os_string(),
        ]);
        args
    }

    /// Runs the script to completion with both output streams buffered.
    ///
    /// Only a failure to start the process is an error; whatever exit code the
    /// script returns is captured in the [`RunResult`].
    pub fn launch(
        &self,
        run_id: &str,
        output_dir: &Path,
        config_path: &Path,
    ) -> Result<RunResult, EngineError> {
        let program = self.program();
        let args = self.args(run_id, output_dir, config_path);
        debug!("Running inference code: {:?} {:?}", program, args);

        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|e| EngineError::Spawn {
                program: program.to_string_lossy().into_owned(),
                source: e,
            })?;
        let result = RunResult::from(output);

        info!("Completed running inference code, retcode {}", result.retcode);
        debug!("stdout:\n{}", result.stdout);
        debug!("stderr:\n{}", result.stderr);
        info!("Output files are in {:?}", output_dir);
        Ok(result)
    }
}
