use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::FilesError;

/// Expands `$VAR` and `${VAR}` and then a leading `~`. Unknown variables are
/// left untouched.
pub fn expandpath(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref().to_string_lossy();
    expand_user(&expand_vars(&path))
}

/// Splits the path list in `envvar` and expands every entry.
///
/// With `validate`, entries that do not exist on disk are dropped.
pub fn expandenv(envvar: &str, validate: bool) -> Result<Vec<PathBuf>, FilesError> {
    let raw =
        env::var_os(envvar).ok_or_else(|| FilesError::EnvVarMissing(envvar.to_string()))?;
    if raw.is_empty() {
        return Err(FilesError::EnvVarEmpty(envvar.to_string()));
    }

    let paths = env::split_paths(&raw)
        .map(expandpath)
        .filter(|path| {
            let keep = !validate || path.exists();
            if !keep {
                debug!(envvar, path = %path.display(), "skipping missing path");
            }
            keep
        })
        .collect();
    Ok(paths)
}

/// Locates `program`, either as an existing absolute path or on `$PATH`.
///
/// Executables are resolved through `which` first, so platform extensions
/// such as `.exe` apply. Failing that, the first `$PATH` entry holding a
/// regular file named `program` wins, executable or not.
pub fn which(program: &str) -> Result<PathBuf, FilesError> {
    let path = Path::new(program);
    if path.is_absolute() && path.is_file() {
        return Ok(path.to_path_buf());
    }
    if let Ok(found) = which::which(program) {
        return Ok(found);
    }

    env::var_os("PATH")
        .into_iter()
        .flat_map(|paths| env::split_paths(&paths).collect::<Vec<_>>())
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| FilesError::NotFound(program.to_string()))
}

fn expand_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };

        match env::var(name) {
            Ok(value) if !name.is_empty() => out.push_str(&value),
            _ => out.push_str(&rest[start..start + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

fn expand_user(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    if !(rest.is_empty() || rest.starts_with(std::path::is_separator)) {
        return PathBuf::from(path);
    }

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(std::path::is_separator)),
        None => PathBuf::from(path),
    }
}
