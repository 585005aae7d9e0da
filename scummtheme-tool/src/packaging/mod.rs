use anyhow::Result;
use scummtheme_lib::{ThemeConfig, ThemeError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::runtime::Builder;
use tracing::{info, warn};

use crate::fs_utils::{list_theme_dirs, list_theme_files, theme_dir};
use crate::packaging::zip::{FileEntry, write_zip_async};

pub mod zip;

/// True when `err` only means "this target is not a theme directory".
pub fn is_invalid_target(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ThemeError>()
        .is_some_and(ThemeError::is_invalid_dir)
}

fn prepare_entries(files: Vec<PathBuf>, config: &ThemeConfig) -> Vec<FileEntry> {
    files
        .into_iter()
        .filter_map(|path| {
            let name = config.entry_name(path.file_name()?.as_encoded_bytes());
            Some(FileEntry {
                name_in_archive: name,
                path,
            })
        })
        .collect()
}

/// Writes the archive from synchronous code, driving the async writer on a
/// current-thread runtime.
fn create_zip_sync(out: &Path, config: &ThemeConfig, entries: &[FileEntry]) -> Result<()> {
    let rt = Builder::new_current_thread().enable_all().build()?;

    rt.block_on(write_zip_async(out, config.compression, entries, |fe| {
        let name = fe.path.file_name().unwrap_or_default().to_string_lossy();
        println!("    Adding file: {name}");
    }))
}

/// Packs the top-level files of `base/name` into `base/<name>.zip`.
///
/// Returns the archive path. A missing or non-directory target is reported
/// and surfaces as [`ThemeError::InvalidThemeDir`] without touching the disk.
pub fn build_theme(base: &Path, name: &OsStr, config: &ThemeConfig) -> Result<PathBuf> {
    let display = name.to_string_lossy();
    let Some(dir) = theme_dir(base, name) else {
        println!("Invalid theme name: {display}");
        return Err(ThemeError::InvalidThemeDir(display.into_owned()).into());
    };

    let files = list_theme_files(&dir, config)?;
    let entries = prepare_entries(files, config);
    let out = base.join(config.archive_name(name));

    println!("Building '{display}' theme:");
    create_zip_sync(&out, config, &entries)?;

    info!(archive = %out.display(), files = entries.len(), "theme archive written");
    Ok(out)
}

/// Builds an archive for every non-hidden directory inside `base`.
///
/// Targets rejected as invalid are skipped; any other failure stops the batch.
pub fn build_all_themes(base: &Path, config: &ThemeConfig) -> Result<Vec<PathBuf>> {
    let mut built = Vec::new();

    for name in list_theme_dirs(base, config)? {
        match build_theme(base, &name, config) {
            Ok(archive) => built.push(archive),
            Err(err) if is_invalid_target(&err) => {
                warn!(theme = %name.to_string_lossy(), "skipping: {err}")
            }
            Err(err) => return Err(err),
        }
    }

    Ok(built)
}
