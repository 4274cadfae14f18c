//! Scratch space, json persistence and path helpers shared by farm
//! processes.

mod json;
mod path;
mod temp;

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use derive_more::IsVariant;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub use json::{json_dump, json_dump_to, json_load, json_load_from};
pub use path::{expandenv, expandpath, which};
pub use temp::{TempFile, TempFileBuilder};

/// Mode of the directories created by [`tempdir`].
pub const DEFAULT_PERMISSIONS: u32 = 0o700;

/// Overrides [`tempdir`] when `respect_env` is set.
pub const TMP_ENV: &str = "FARM_TMP";

#[derive(Debug, Error, IsVariant)]
pub enum FilesError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("${0} is not set")]
    EnvVarMissing(String),
    #[error("${0} is empty")]
    EnvVarEmpty(String),
    #[error("{0} not found")]
    NotFound(String),
}

/// Per-process scratch root, `<system temp>/farm/<pid>`. Not created until
/// something is written below it.
pub fn session_directory() -> &'static Path {
    static SESSION: OnceLock<PathBuf> = OnceLock::new();
    SESSION.get_or_init(|| {
        std::env::temp_dir()
            .join("farm")
            .join(crate::process::get_self_pid().to_string())
    })
}

/// Returns a directory to write temporary data to.
///
/// With `respect_env` and [`TMP_ENV`] set, that directory is returned
/// (created if missing). Otherwise a new, unique directory is created inside
/// the [`session_directory`] with `mode`, or [`DEFAULT_PERMISSIONS`].
pub fn tempdir(respect_env: bool, mode: Option<u32>) -> Result<PathBuf, FilesError> {
    if respect_env {
        if let Some(dir) = std::env::var_os(TMP_ENV).filter(|dir| !dir.is_empty()) {
            let dir = PathBuf::from(dir);
            fs::create_dir_all(&dir)?;
            return Ok(dir);
        }
    }

    let session = session_directory();
    fs::create_dir_all(session)?;

    let dir = session.join(Uuid::new_v4().simple().to_string());
    fs::create_dir(&dir)?;
    set_mode(&dir, mode.unwrap_or(DEFAULT_PERMISSIONS))?;
    debug!(path = %dir.display(), "created temp directory");
    Ok(dir)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
