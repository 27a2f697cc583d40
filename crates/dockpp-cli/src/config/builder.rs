use super::defaults::DefaultsConfig;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::home::InstallManager;
use dockpp::core::io::config_doc::ConfigOverride;
use dockpp::core::models::request::{RunRequest, RunRequestBuilder};
use std::path::Path;
use tracing::debug;

/// Merges command-line arguments with the defaults into a [`RunRequest`].
///
/// The install root is only looked up when the script or the template falls back
/// to its default location.
pub fn build_request(args: &RunArgs, defaults: &DefaultsConfig) -> Result<RunRequest> {
    let mut home = None;

    let inference_script = match &args.inference_script {
        Some(path) => path.clone(),
        None => install_root(&mut home, args.home.as_deref())?.resolve(&defaults.inference_script),
    };
    let config_template = match &args.config_template {
        Some(path) => path.clone(),
        None => install_root(&mut home, args.home.as_deref())?.resolve(&defaults.config_template),
    };

    let output_dir = match &args.outdir {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    let interpreter = if args.direct {
        None
    } else {
        Some(
            args.interpreter
                .clone()
                .unwrap_or_else(|| defaults.interpreter.clone()),
        )
    };

    let overrides = parse_set_values(&args.set_values)?;

    let request = RunRequestBuilder::new()
        .run_id(args.run_id.clone())
        .antibody_path(args.antibody.clone())
        .antigen_path(args.antigen.clone())
        .inference_script(inference_script)
        .interpreter(interpreter)
        .output_dir(output_dir)
        .config_template(config_template)
        .overrides(overrides)
        .save_log(args.save_log)
        .workspace_root(args.workspace_root.clone())
        .build()?;
    debug!("Built run request: {:?}", &request);
    Ok(request)
}

fn install_root<'a>(
    slot: &'a mut Option<InstallManager>,
    explicit: Option<&Path>,
) -> Result<&'a InstallManager> {
    if slot.is_none() {
        *slot = Some(InstallManager::new(explicit)?);
    }
    slot.as_ref()
        .ok_or_else(|| CliError::Home("Install root could not be resolved.".to_string()))
}

fn parse_set_values(set_values: &[String]) -> Result<Vec<ConfigOverride>> {
    set_values
        .iter()
        .map(|kv_pair| {
            kv_pair.parse::<ConfigOverride>().map_err(|_| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base_run_args() -> RunArgs {
        RunArgs {
            run_id: None,
            antibody: PathBuf::from("1a22_ab.pdb"),
            antigen: PathBuf::from("1a22_ag.pdb"),
            outdir: Some(PathBuf::from("results")),
            inference_script: None,
            config_template: None,
            interpreter: None,
            direct: false,
            set_values: vec![],
            save_log: false,
            workspace_root: None,
            home: Some(PathBuf::from("/opt/DiffDock-PP")),
        }
    }

    #[test]
    fn defaults_resolve_under_install_root() {
        let request = build_request(&base_run_args(), &DefaultsConfig::default()).unwrap();

        assert_eq!(
            request.inference_script,
            PathBuf::from("/opt/DiffDock-PP/src/db5_inference.sh")
        );
        assert_eq!(
            request.config_template,
            PathBuf::from("/opt/DiffDock-PP/config/single_pair_inference.yaml")
        );
        assert_eq!(request.interpreter.as_deref(), Some("zsh"));
        assert_eq!(request.output_dir, PathBuf::from("results"));
        assert_eq!(request.run_id().unwrap(), "1a22_ab");
        assert!(!request.save_log);
    }

    #[test]
    fn explicit_paths_override_install_root() {
        let mut args = base_run_args();
        args.home = None;
        args.inference_script = Some(PathBuf::from("/custom/infer.sh"));
        args.config_template = Some(PathBuf::from("/custom/template.yaml"));
        args.run_id = Some("1a22".to_string());
        args.save_log = true;

        let request = build_request(&args, &DefaultsConfig::default()).unwrap();

        assert_eq!(request.inference_script, PathBuf::from("/custom/infer.sh"));
        assert_eq!(
            request.config_template,
            PathBuf::from("/custom/template.yaml")
        );
        assert_eq!(request.run_id().unwrap(), "1a22");
        assert!(request.save_log);
    }

    #[test]
    fn workspace_root_is_passed_through() {
        let mut args = base_run_args();
        assert!(
            build_request(&args, &DefaultsConfig::default())
                .unwrap()
                .workspace_root
                .is_none()
        );

        args.workspace_root = Some(PathBuf::from("/scratch/dockpp"));
        let request = build_request(&args, &DefaultsConfig::default()).unwrap();
        assert_eq!(request.workspace_root, Some(PathBuf::from("/scratch/dockpp")));
    }

    #[test]
    fn interpreter_selection() {
        let mut args = base_run_args();
        args.interpreter = Some("bash".to_string());
        let request = build_request(&args, &DefaultsConfig::default()).unwrap();
        assert_eq!(request.interpreter.as_deref(), Some("bash"));

        let mut args = base_run_args();
        args.direct = true;
        let request = build_request(&args, &DefaultsConfig::default()).unwrap();
        assert!(request.interpreter.is_none());
    }

    #[test]
    fn missing_outdir_falls_back_to_current_directory() {
        let mut args = base_run_args();
        args.outdir = None;
        let request = build_request(&args, &DefaultsConfig::default()).unwrap();
        assert_eq!(request.output_dir, std::env::current_dir().unwrap());
    }

    #[test]
    fn set_values_become_overrides() {
        let mut args = base_run_args();
        args.set_values = vec![
            "model.num_steps=20".to_string(),
            "data.resolution=residue".to_string(),
        ];
        let request = build_request(&args, &DefaultsConfig::default()).unwrap();
        assert_eq!(
            request.overrides,
            vec![
                ConfigOverride {
                    key: "model.num_steps".to_string(),
                    value: "20".to_string()
                },
                ConfigOverride {
                    key: "data.resolution".to_string(),
                    value: "residue".to_string()
                },
            ]
        );
    }

    #[test]
    fn malformed_set_value_is_a_config_error() {
        let mut args = base_run_args();
        args.set_values = vec!["model.num_steps".to_string()];
        let result = build_request(&args, &DefaultsConfig::default());
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
