use glob::Pattern;
use std::ffi::{OsStr, OsString};

pub mod error;
pub mod stx;

pub use error::ThemeError;

/// Compression algorithm to use when writing theme archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compressor {
    Deflate,
    #[default]
    Stored,
}

/// Fixed parameters shared by the archiver and the definition compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Extension (with the dot) that marks a style source file.
    pub style_extension: String,
    /// Name of the generated definition listing.
    pub definition_file: String,
    /// Extension (without the dot) appended to a theme name for its archive.
    pub archive_extension: String,
    /// Prefix prepended to every file name stored in an archive.
    pub entry_prefix: String,
    /// Names starting with this prefix are treated as hidden.
    pub hidden_prefix: char,
    pub compression: Compressor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            style_extension: ".stx".to_string(),
            definition_file: "default.inc".to_string(),
            archive_extension: "zip".to_string(),
            entry_prefix: "./".to_string(),
            hidden_prefix: '.',
            compression: Compressor::Stored,
        }
    }
}

impl ThemeConfig {
    /// Glob matching the file names of style sources, e.g. `*.stx`.
    pub fn style_pattern(&self) -> Result<Pattern, glob::PatternError> {
        Pattern::new(&format!("*{}", Pattern::escape(&self.style_extension)))
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        name.starts_with(self.hidden_prefix)
    }

    pub fn archive_name(&self, theme: &OsStr) -> OsString {
        let mut name = theme.to_os_string();
        name.push(".");
        name.push(&self.archive_extension);
        name
    }

    /// Archive path for a file name given as raw bytes; the bytes are kept as is.
    pub fn entry_name(&self, file_name: &[u8]) -> Vec<u8> {
        let mut name = self.entry_prefix.as_bytes().to_vec();
        name.extend_from_slice(file_name);
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_pattern_matches_extension_only() {
        let cfg = ThemeConfig::default();
        let pattern = cfg.style_pattern().unwrap();
        assert!(pattern.matches("scummclassic_layout.stx"));
        assert!(pattern.matches(".stx"));
        assert!(!pattern.matches("layout.stx.bak"));
        assert!(!pattern.matches("layoutstx"));
        assert!(!pattern.matches("THEMERC"));
    }

    #[test]
    fn naming_helpers() {
        let cfg = ThemeConfig::default();
        assert_eq!(cfg.archive_name(OsStr::new("scummmodern")), "scummmodern.zip");
        assert_eq!(cfg.entry_name(b"THEMERC"), b"./THEMERC");
        assert_eq!(cfg.entry_name(b"caf\xe9.bmp"), b"./caf\xe9.bmp");
        assert!(cfg.is_hidden(".svn"));
        assert!(!cfg.is_hidden("fonts.dat"));
        assert_eq!(cfg.compression, Compressor::Stored);
    }
}
