use crate::core::io::config_doc::ConfigDocument;
use crate::core::io::log_record;
use crate::core::models::request::RunRequest;
use crate::core::models::result::RunResult;
use crate::engine::error::{EngineError, InputRole};
use crate::engine::inference::InferenceLauncher;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::workspace::Workspace;
use std::fs;
use std::path::Path;
use tracing::{Span, debug, info, instrument};

pub const LOG_FILE_NAME: &str = "log.json";

/// Runs one antibody-antigen inference end to end.
///
/// The inputs are checked before anything touches the filesystem. After that the
/// output directory is created, a temporary workspace is staged with the rewritten
/// configuration, the manifest and the two structures, and the inference script is
/// run to completion. The captured [`RunResult`] is returned as-is (a non-zero
/// `retcode` is not an error) and, if requested, written to `log.json` in the output
/// directory. The workspace is removed whether the run succeeds or fails.
#[instrument(skip_all, name = "run_workflow", fields(run_id = tracing::field::Empty))]
pub fn execute(request: &RunRequest, reporter: &ProgressReporter) -> Result<RunResult, EngineError> {
    // === Phase 0: Validate inputs ===
    reporter.report(Progress::PhaseStart {
        name: "Validating inputs",
    });
    check_inputs(request)?;
    let run_id = request.run_id()?;
    Span::current().record("run_id", run_id.as_str());
    reporter.report(Progress::PhaseFinish);

    fs::create_dir_all(&request.output_dir).map_err(|e| {
        EngineError::io(
            format!("create output directory '{}'", request.output_dir.display()),
            e,
        )
    })?;

    // === Phase 1: Stage workspace ===
    reporter.report(Progress::PhaseStart {
        name: "Staging workspace",
    });
    let workspace = match &request.workspace_root {
        Some(root) => Workspace::create_in(root)?,
        None => Workspace::create()?,
    };
    let config_path = stage(&workspace, request, &run_id)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Inference ===
    reporter.report(Progress::InferenceStarted {
        run_id: run_id.clone(),
    });
    let launcher = InferenceLauncher::new(&request.inference_script, request.interpreter.clone());
    let result = launcher.launch(&run_id, &request.output_dir, &config_path)?;
    reporter.report(Progress::InferenceFinished {
        retcode: result.retcode,
    });

    // === Phase 3: Record and clean up ===
    if request.save_log {
        let log_path = request.output_dir.join(LOG_FILE_NAME);
        debug!("Saving log to {:?}", &log_path);
        log_record::write_log(&log_path, &result)?;
        reporter.report(Progress::Message(format!(
            "Log saved to {}",
            log_path.display()
        )));
    }

    workspace.close()?;
    info!(
        "Run '{}' finished with retcode {}; temporary workspace removed.",
        run_id, result.retcode
    );
    Ok(result)
}

fn check_inputs(request: &RunRequest) -> Result<(), EngineError> {
    let inputs = [
        (InputRole::Antibody, &request.antibody_path),
        (InputRole::Antigen, &request.antigen_path),
        (InputRole::InferenceScript, &request.inference_script),
    ];
    for (role, path) in inputs {
        if !path.exists() {
            return Err(EngineError::MissingInput {
                role,
                path: path.clone(),
            });
        }
    }
    Ok(())
}

/// Populates the workspace and returns the path of the staged configuration.
fn stage(
    workspace: &Workspace,
    request: &RunRequest,
    run_id: &str,
) -> Result<std::path::PathBuf, EngineError> {
    debug!("Processing config file: {:?}", &request.config_template);
    let document = prepare_config(&request.config_template, request, workspace)?;
    debug!("Processed config: {:?}", document.as_value());

    let config_path = workspace.write_config(&document)?;
    workspace.write_manifest(run_id)?;
    workspace.stage_structures(run_id, &request.antibody_path, &request.antigen_path)?;
    Ok(config_path)
}

fn prepare_config(
    template: &Path,
    request: &RunRequest,
    workspace: &Workspace,
) -> Result<ConfigDocument, EngineError> {
    let mut document = ConfigDocument::load(template)?;
    for edit in &request.overrides {
        debug!("Applying configuration override: {}", edit);
        document.apply(edit)?;
    }
    document.point_at_workspace(&workspace.manifest_path(), workspace.path())?;
    Ok(document)
}
