use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const HOME_ENV: &str = "DOCKPP_HOME";
const PATH_CONFIG_FILE: &str = "home.conf";

/// Locates the DiffDock-PP checkout that holds the default inference script and
/// configuration template.
///
/// Resolution order: an explicit path (`--home` / `DOCKPP_HOME`), then a path
/// persisted with `dockpp home set-path`, then the OS-specific data directory.
#[derive(Debug)]
pub struct InstallManager {
    home: PathBuf,
}

impl InstallManager {
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        let home = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::determine_home()?,
        };
        debug!("InstallManager initialized with home: {:?}", &home);
        Ok(Self { home })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Joins a path relative to the install root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.home.join(relative)
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        let absolute = std::path::absolute(path)?;
        let as_str = absolute.to_str().ok_or_else(|| {
            CliError::Home(format!("Path is not valid UTF-8: {:?}", absolute))
        })?;
        let config_path = Self::get_path_config_file()?;
        write_persisted_home(&config_path, as_str)?;
        info!("Persisted install root {:?} in {:?}", absolute, config_path);
        Ok(())
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_home() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) => match read_persisted_home(&config_path)? {
                Some(path) => Ok(path),
                None => Self::get_default_home(),
            },
            Err(_) => Self::get_default_home(),
        }
    }

    fn get_path_config_file() -> Result<PathBuf> {
        ProjectDirs::from("edu", "caltech", "dockpp")
            .map(|dirs| dirs.config_dir().join(PATH_CONFIG_FILE))
            .ok_or_else(|| CliError::Home("Could not determine config directory path.".to_string()))
    }

    fn get_default_home() -> Result<PathBuf> {
        ProjectDirs::from("edu", "caltech", "dockpp")
            .map(|dirs| dirs.data_dir().join("DiffDock-PP"))
            .ok_or_else(|| {
                CliError::Home("Could not determine default install root.".to_string())
            })
    }
}

fn read_persisted_home(config_path: &Path) -> Result<Option<PathBuf>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let custom = fs::read_to_string(config_path)?.trim().to_string();
    if custom.is_empty() {
        warn!("Install root config file is empty, falling back to default path.");
        return Ok(None);
    }
    Ok(Some(PathBuf::from(custom)))
}

fn write_persisted_home(config_path: &Path, home: &str) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, home).map_err(CliError::from)
}
