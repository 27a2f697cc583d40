use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const RUN_AFTER_HELP: &str = "\
Example:
    dockpp run -n 1a22 -i 1a22_r_b.pdb -j 1a22_l_b.pdb -o /path/to/output --save-log";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "DockPP CLI - stage an antibody-antigen pair and run DiffDock-PP inference on it.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage one antibody-antigen pair and run the inference script on it.
    Run(RunArgs),
    /// Manage the DiffDock-PP install root used to locate the default script and template.
    Home(HomeArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
#[command(after_help = RUN_AFTER_HELP)]
pub struct RunArgs {
    // --- Inputs ---
    /// Run identifier used in the manifest and staged file names.
    /// Defaults to the antibody file name without its extension.
    #[arg(short = 'n', long, value_name = "ID")]
    pub run_id: Option<String>,

    /// Path to the antibody-only structure file.
    #[arg(short = 'i', long, required = true, value_name = "PATH")]
    pub antibody: PathBuf,

    /// Path to the antigen-only structure file.
    #[arg(short = 'j', long, required = true, value_name = "PATH")]
    pub antigen: PathBuf,

    /// Output directory handed to the inference script. Defaults to the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub outdir: Option<PathBuf>,

    // --- Inference ---
    /// Inference script to run. Defaults to `src/db5_inference.sh` under the install root.
    #[arg(short = 's', long, value_name = "PATH")]
    pub inference_script: Option<PathBuf>,

    /// Configuration template. Defaults to `config/single_pair_inference.yaml` under the install root.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config_template: Option<PathBuf>,

    /// Program used to run the inference script (default: zsh).
    #[arg(long, value_name = "PROGRAM", conflicts_with = "direct")]
    pub interpreter: Option<String>,

    /// Execute the inference script directly instead of through an interpreter.
    #[arg(long)]
    pub direct: bool,

    /// Set a value in the configuration template before staging.
    /// Can be used multiple times. Example: -S model.num_steps=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Save the exit code and captured output to `log.json` in the output directory.
    #[arg(long)]
    pub save_log: bool,

    /// Directory to create the temporary workspace in. Defaults to the system temp directory.
    #[arg(long, value_name = "PATH")]
    pub workspace_root: Option<PathBuf>,

    /// DiffDock-PP install root used to resolve default paths.
    #[arg(long, env = crate::home::HOME_ENV, value_name = "PATH")]
    pub home: Option<PathBuf>,
}

/// Arguments for the `home` subcommand.
#[derive(Args, Debug)]
pub struct HomeArgs {
    #[command(subcommand)]
    pub command: HomeCommands,
}

#[derive(Subcommand, Debug)]
pub enum HomeCommands {
    /// Show the install root currently in effect.
    Path,
    /// Persist a custom install root.
    SetPath {
        /// The DiffDock-PP checkout containing `src/` and `config/`.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Forget the persisted install root and fall back to the OS-specific default.
    ResetPath,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_short_flags() {
        let cli = Cli::try_parse_from([
            "dockpp", "run", "-n", "1a22", "-i", "ab.pdb", "-j", "ag.pdb", "-o", "out", "-s",
            "infer.sh", "-c", "tpl.yaml", "-S", "model.num_steps=20", "--save-log", "-vv",
            "--workspace-root", "/scratch",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.run_id.as_deref(), Some("1a22"));
        assert_eq!(args.antibody, PathBuf::from("ab.pdb"));
        assert_eq!(args.antigen, PathBuf::from("ag.pdb"));
        assert_eq!(args.outdir, Some(PathBuf::from("out")));
        assert_eq!(args.set_values, vec!["model.num_steps=20".to_string()]);
        assert!(args.save_log);
        assert_eq!(args.workspace_root, Some(PathBuf::from("/scratch")));
    }

    #[test]
    fn run_requires_both_structures() {
        let result = Cli::try_parse_from(["dockpp", "run", "-i", "ab.pdb"]);
        assert!(result.is_err());
    }

    #[test]
    fn interpreter_conflicts_with_direct() {
        let result = Cli::try_parse_from([
            "dockpp",
            "run",
            "-i",
            "ab.pdb",
            "-j",
            "ag.pdb",
            "--interpreter",
            "bash",
            "--direct",
        ]);
        assert!(result.is_err());
    }
}
