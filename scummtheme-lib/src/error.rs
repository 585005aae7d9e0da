use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    /// Target of `make`/`make-all` is missing or not a directory.
    #[error("invalid theme name: {0}")]
    InvalidThemeDir(String),

    /// Target of `default` is missing or not a directory.
    #[error("cannot open default theme dir: {}", .0.display())]
    MissingDefaultDir(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ThemeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for outcomes that skip a single target instead of failing the run.
    pub fn is_invalid_dir(&self) -> bool {
        matches!(
            self,
            ThemeError::InvalidThemeDir(_) | ThemeError::MissingDefaultDir(_)
        )
    }
}
