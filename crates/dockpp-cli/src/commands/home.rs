use crate::cli::{HomeArgs, HomeCommands};
use crate::error::Result;
use crate::home::{HOME_ENV, InstallManager};
use std::path::PathBuf;

pub fn run(args: HomeArgs) -> Result<()> {
    match args.command {
        HomeCommands::Path => handle_path(),
        HomeCommands::SetPath { path } => handle_set_path(path),
        HomeCommands::ResetPath => handle_reset_path(),
    }
}

fn handle_path() -> Result<()> {
    let explicit = std::env::var_os(HOME_ENV).map(PathBuf::from);
    let manager = InstallManager::new(explicit.as_deref())?;
    println!("{}", manager.home().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    if !path.is_dir() {
        println!(
            "Warning: {} does not exist yet; it will be used once it does.",
            path.display()
        );
    }
    InstallManager::set_custom_path(&path)?;
    println!("✓ Install root set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    InstallManager::reset_path()?;
    let manager = InstallManager::new(None)?;
    println!(
        "✓ Install root reset to default: {}",
        manager.home().display()
    );
    Ok(())
}
