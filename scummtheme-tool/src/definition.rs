use anyhow::{Context, Result};
use scummtheme_lib::{ThemeConfig, ThemeError, stx};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::fs_utils::{list_style_sources, theme_dir};

/// Appends the normalized lines of one style source to `out`.
/// Returns how many lines were written.
pub fn write_definitions<W: Write>(out: &mut W, text: &[u8]) -> std::io::Result<usize> {
    let lines = stx::normalize(text);
    for line in &lines {
        out.write_all(line)?;
        out.write_all(b"\n")?;
    }
    Ok(lines.len())
}

/// Compiles every style source in `base/name` into `base/default.inc`.
///
/// The output is truncated before anything else happens, so a target that is
/// not a directory leaves an empty listing behind and yields
/// [`ThemeError::MissingDefaultDir`].
pub fn build_default_theme(base: &Path, name: &OsStr, config: &ThemeConfig) -> Result<PathBuf> {
    let out_path = base.join(&config.definition_file);
    let file = File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    let mut out = BufWriter::new(file);

    let Some(dir) = theme_dir(base, name) else {
        println!("Cannot open default theme dir.");
        return Err(ThemeError::MissingDefaultDir(base.join(name)).into());
    };

    let pattern = config
        .style_pattern()
        .with_context(|| format!("invalid style extension {:?}", config.style_extension))?;
    for source in list_style_sources(&dir, &pattern)? {
        let text = fs::read(&source)
            .with_context(|| format!("reading {}", source.display()))?;
        let count = write_definitions(&mut out, &text)
            .with_context(|| format!("writing {}", out_path.display()))?;
        debug!(source = %source.display(), lines = count, "style source compiled");
    }

    out.flush()
        .with_context(|| format!("flushing {}", out_path.display()))?;
    info!(output = %out_path.display(), "definition listing written");
    Ok(out_path)
}
