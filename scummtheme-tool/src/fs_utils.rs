use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

use glob::Pattern;
use scummtheme_lib::{ThemeConfig, ThemeError};
use tracing::debug;

/// Lists top-level entries of `dir` that satisfy `keep`, in the order the
/// filesystem returns them. Nothing below `dir` is visited.
///
/// `keep` sees a lossy UTF-8 name, which is enough for the hidden-prefix and
/// extension checks; the returned paths keep the original bytes.
fn list_entries<F>(dir: &Path, mut keep: F) -> Result<Vec<PathBuf>, ThemeError>
where
    F: FnMut(&Path, &str) -> bool,
{
    let mut result = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| ThemeError::io(dir, e))? {
        let entry = entry.map_err(|e| ThemeError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if keep(&path, &name) {
            result.push(path);
        } else {
            debug!(path = %path.display(), "skipping entry");
        }
    }

    Ok(result)
}

/// Resolves `base/name` when it names an existing directory. An empty name is
/// rejected rather than resolving to `base` itself.
pub fn theme_dir(base: &Path, name: &OsStr) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    let dir = base.join(name);
    dir.is_dir().then_some(dir)
}

/// Regular, non-hidden files directly inside a theme directory.
pub fn list_theme_files(dir: &Path, config: &ThemeConfig) -> Result<Vec<PathBuf>, ThemeError> {
    list_entries(dir, |path, name| path.is_file() && !config.is_hidden(name))
}

/// Names of the non-hidden directories directly inside `base`.
pub fn list_theme_dirs(base: &Path, config: &ThemeConfig) -> Result<Vec<OsString>, ThemeError> {
    let dirs = list_entries(base, |path, name| path.is_dir() && !config.is_hidden(name))?;
    Ok(dirs
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_os_string())
        .collect())
}

/// Regular files directly inside `dir` whose name matches `pattern`.
pub fn list_style_sources(dir: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, ThemeError> {
    list_entries(dir, |path, name| path.is_file() && pattern.matches(name))
}
