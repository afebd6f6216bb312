use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine the platform home directory")]
    NoHome,

    #[error("failed to create home directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// `%APPDATA%` on Windows, the user home elsewhere.
fn platform_home() -> Result<PathBuf, HomeDirError> {
    #[cfg(target_os = "windows")]
    let home = dirs::config_dir();
    #[cfg(not(target_os = "windows"))]
    let home = dirs::home_dir();
    home.ok_or(HomeDirError::NoHome)
}

fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: &Path) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
    Ok(cwd.join(p))
}

/// Resolve the server home directory.
///
/// `None` falls back to `<platform home>/<default_subdir>`; `~` is expanded and
/// relative paths are anchored at the current directory.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let raw = match configured {
        Some(p) => expand_tilde(p.trim())?,
        None => platform_home()?.join(default_subdir),
    };
    let resolved = absolutize(&raw)?;

    if create {
        std::fs::create_dir_all(&resolved).map_err(|source| HomeDirError::Create {
            path: resolved.clone(),
            source,
        })?;
    }
    Ok(resolved)
}
