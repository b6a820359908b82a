use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project / per-user data directory
pub const DATA_DIR_NAME: &str = ".tasktimer";

/// Name of the JSON document holding tasks and categories
pub const DATA_FILE_NAME: &str = "tasks.json";

/// Get the data directory - checks for local .tasktimer first, then falls back to global ~/.tasktimer
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .tasktimer directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure a directory exists, creating parents as needed
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Initialize a local .tasktimer directory in the current directory
pub fn init_local_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    init_data_dir_in(&current_dir)
}

fn init_data_dir_in(parent: &Path) -> Result<PathBuf> {
    let data_dir = parent.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Resolve the data file: an explicit path wins, otherwise tasks.json in the data directory
pub fn resolve_data_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(ensure_dir(get_data_dir()?)?.join(DATA_FILE_NAME)),
    }
}

/// Log directory that sits next to the data file
pub fn log_dir_for(data_file: &Path) -> PathBuf {
    data_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("logs")
}
