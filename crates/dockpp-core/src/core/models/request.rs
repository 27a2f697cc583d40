use crate::core::io::config_doc::ConfigOverride;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RequestError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Run identifier cannot be empty")]
    EmptyRunId,

    #[error("Cannot derive a run identifier from '{}': the path has no usable file stem", .0.display())]
    NoFileStem(PathBuf),
}

/// Everything needed to stage and launch one antibody-antigen inference run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub run_id: Option<String>,
    pub antibody_path: PathBuf,
    pub antigen_path: PathBuf,
    pub inference_script: PathBuf,
    /// Program used to run `inference_script`. `None` executes the script directly.
    pub interpreter: Option<String>,
    pub output_dir: PathBuf,
    pub config_template: PathBuf,
    pub overrides: Vec<ConfigOverride>,
    pub save_log: bool,
    /// Directory the temporary workspace is created in. `None` uses the system
    /// temporary directory.
    pub workspace_root: Option<PathBuf>,
}

impl RunRequest {
    /// Resolves the identifier used in the manifest row and the staged file names.
    ///
    /// An explicit identifier wins; otherwise the antibody file's stem is used
    /// (`/data/1abc.pdb` becomes `1abc`).
    pub fn run_id(&self) -> Result<String, RequestError> {
        match &self.run_id {
            Some(id) if id.is_empty() => Err(RequestError::EmptyRunId),
            Some(id) => Ok(id.clone()),
            None => stem_of(&self.antibody_path),
        }
    }
}

fn stem_of(path: &Path) -> Result<String, RequestError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RequestError::NoFileStem(path.to_path_buf()))
}

#[derive(Default)]
pub struct RunRequestBuilder {
    run_id: Option<String>,
    antibody_path: Option<PathBuf>,
    antigen_path: Option<PathBuf>,
    inference_script: Option<PathBuf>,
    interpreter: Option<String>,
    output_dir: Option<PathBuf>,
    config_template: Option<PathBuf>,
    overrides: Vec<ConfigOverride>,
    save_log: bool,
    workspace_root: Option<PathBuf>,
}

impl RunRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_id(mut self, id: Option<String>) -> Self {
        self.run_id = id;
        self
    }
    pub fn antibody_path(mut self, path: PathBuf) -> Self {
        self.antibody_path = Some(path);
        self
    }
    pub fn antigen_path(mut self, path: PathBuf) -> Self {
        self.antigen_path = Some(path);
        self
    }
    pub fn inference_script(mut self, path: PathBuf) -> Self {
        self.inference_script = Some(path);
        self
    }
    pub fn interpreter(mut self, program: Option<String>) -> Self {
        self.interpreter = program;
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn config_template(mut self, path: PathBuf) -> Self {
        self.config_template = Some(path);
        self
    }
    pub fn overrides(mut self, overrides: Vec<ConfigOverride>) -> Self {
        self.overrides = overrides;
        self
    }
    pub fn save_log(mut self, save: bool) -> Self {
        self.save_log = save;
        self
    }
    pub fn workspace_root(mut self, path: Option<PathBuf>) -> Self {
        self.workspace_root = path;
        self
    }

    pub fn build(self) -> Result<RunRequest, RequestError> {
        Ok(RunRequest {
            run_id: self.run_id,
            antibody_path: self
                .antibody_path
                .ok_or(RequestError::MissingParameter("antibody_path"))?,
            antigen_path: self
                .antigen_path
                .ok_or(RequestError::MissingParameter("antigen_path"))?,
            inference_script: self
                .inference_script
                .ok_or(RequestError::MissingParameter("inference_script"))?,
            interpreter: self.interpreter,
            output_dir: self
                .output_dir
                .ok_or(RequestError::MissingParameter("output_dir"))?,
            config_template: self
                .config_template
                .ok_or(RequestError::MissingParameter("config_template"))?,
            overrides: self.overrides,
            save_log: self.save_log,
            workspace_root: self.workspace_root,
        })
    }
}
