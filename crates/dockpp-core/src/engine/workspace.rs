use super::error::EngineError;
use crate::core::io::config_doc::ConfigDocument;
use crate::core::io::manifest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const MANIFEST_FILE_NAME: &str = "splits_test.csv";
pub const STRUCTURES_DIR_NAME: &str = "structures";

const WORKSPACE_PREFIX: &str = "dockpp-";
const RECEPTOR_SUFFIX: &str = "_r_b.pdb";
const LIGAND_SUFFIX: &str = "_l_b.pdb";

/// The per-run input directory handed to the inference script.
///
/// Layout:
///
/// ```text
/// <workspace>/
/// ├── config.yaml          rewritten template
/// ├── splits_test.csv      one-row manifest
/// └── structures/
///     ├── {id}_r_b.pdb     antibody (receptor)
///     └── {id}_l_b.pdb     antigen (ligand)
/// ```
///
/// The directory is removed when the workspace is dropped, on every exit path.
/// [`Workspace::close`] removes it eagerly and reports removal failures.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a workspace under the system temporary directory.
    pub fn create() -> Result<Self, EngineError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(|e| EngineError::io("create temporary workspace", e))?;
        Self::init(dir)
    }

    /// Creates a workspace under `parent` instead of the system temporary directory.
    pub fn create_in(parent: &Path) -> Result<Self, EngineError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| {
                EngineError::io(
                    format!("create temporary workspace in '{}'", parent.display()),
                    e,
                )
            })?;
        Self::init(dir)
    }

    fn init(dir: TempDir) -> Result<Self, EngineError> {
        let workspace = Self { dir };
        let structures = workspace.structures_dir();
        fs::create_dir_all(&structures).map_err(|e| {
            EngineError::io(format!("create '{}'", structures.display()), e)
        })?;
        debug!("Created temporary workspace: {:?}", workspace.path());
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join(CONFIG_FILE_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join(MANIFEST_FILE_NAME)
    }

    pub fn structures_dir(&self) -> PathBuf {
        self.path().join(STRUCTURES_DIR_NAME)
    }

    pub fn receptor_path(&self, run_id: &str) -> PathBuf {
        self.structures_dir()
            .join(format!("{}{}", run_id, RECEPTOR_SUFFIX))
    }

    pub fn ligand_path(&self, run_id: &str) -> PathBuf {
        self.structures_dir()
            .join(format!("{}{}", run_id, LIGAND_SUFFIX))
    }

    pub fn write_config(&self, document: &ConfigDocument) -> Result<PathBuf, EngineError> {
        let path = self.config_path();
        debug!("Writing config file to {:?}", &path);
        document.write_to_path(&path)?;
        Ok(path)
    }

    pub fn write_manifest(&self, run_id: &str) -> Result<PathBuf, EngineError> {
        let path = self.manifest_path();
        debug!("Writing splits file to {:?}", &path);
        manifest::write_manifest(&path, run_id).map_err(|e| EngineError::Manifest {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Copies the antibody and antigen files under their role-suffixed names.
    pub fn stage_structures(
        &self,
        run_id: &str,
        antibody: &Path,
        antigen: &Path,
    ) -> Result<(), EngineError> {
        debug!("Copying structure files to {:?}", self.structures_dir());
        copy_structure(antibody, &self.receptor_path(run_id))?;
        copy_structure(antigen, &self.ligand_path(run_id))?;
        Ok(())
    }

    pub fn close(self) -> Result<(), EngineError> {
        let path = self.path().to_path_buf();
        self.dir.close().map_err(|e| {
            EngineError::io(format!("remove temporary workspace '{}'", path.display()), e)
        })?;
        debug!("Removed temporary workspace: {:?}", path);
        Ok(())
    }
}

fn copy_structure(from: &Path, to: &Path) -> Result<(), EngineError> {
    fs::copy(from, to).map_err(|e| {
        EngineError::io(
            format!("copy '{}' to '{}'", from.display(), to.display()),
            e,
        )
    })?;
    Ok(())
}
