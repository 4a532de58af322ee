use std::env;
use std::io;
use std::path::{PathBuf, MAIN_SEPARATOR};

use clap::ValueEnum;

use crate::util::has_line_break;

pub const DEFAULT_PREFIX: &str = "overlay-tools-";
pub const DEFAULT_SUFFIX: &str = ".sh";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// What to do when a fixed-mode path already exists.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExistingFile {
    /// Discard previous content.
    #[default]
    Truncate,
    /// Keep previous content and add lines after it.
    Append,
    /// Refuse to open an existing file.
    CreateNew,
}

/// Initializer configuration. Defaults produce `$TMPDIR/overlay-tools-<name>.sh`
/// with no header and platform-default permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    pub dir: Option<PathBuf>,
    pub prefix: String,
    pub suffix: String,
    pub max_attempts: u32,
    pub existing: ExistingFile,
    pub header: Vec<String>,
    pub mode: Option<u32>,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            existing: ExistingFile::default(),
            header: Vec::new(),
            mode: None,
        }
    }
}

impl ScriptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn existing(mut self, policy: ExistingFile) -> Self {
        self.existing = policy;
        self
    }

    /// Prepend `#!<interpreter>` as the first header line.
    pub fn shebang(mut self, interpreter: &str) -> Self {
        self.header.insert(0, format!("#!{interpreter}"));
        self
    }

    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Unix permission bits applied to the script file (ignored elsewhere).
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Directory for generated scripts: the configured one or the host temp dir.
    pub fn temp_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(env::temp_dir)
    }

    pub(crate) fn validate(&self) -> io::Result<()> {
        let invalid = |msg: String| Err(io::Error::new(io::ErrorKind::InvalidInput, msg));
        let has_sep = |s: &str| s.chars().any(|c| c == '/' || c == MAIN_SEPARATOR);

        if has_sep(&self.prefix) {
            return invalid(format!("script prefix {:?} contains a path separator", self.prefix));
        }
        if has_sep(&self.suffix) {
            return invalid(format!("script suffix {:?} contains a path separator", self.suffix));
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1".to_string());
        }
        if let Some(i) = self.header.iter().position(|l| has_line_break(l)) {
            return invalid(format!("header line {i} contains a newline or NUL; use atomic lines"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = ScriptOptions::default();
        assert_eq!(o.prefix, "overlay-tools-");
        assert_eq!(o.suffix, ".sh");
        assert_eq!(o.existing, ExistingFile::Truncate);
        assert!(o.header.is_empty());
        assert_eq!(o.temp_dir(), env::temp_dir());
        assert!(o.validate().is_ok());
    }

    #[test]
    fn test_shebang_goes_first() {
        let o = ScriptOptions::new()
            .header_line("set -e")
            .shebang("/bin/sh");
        assert_eq!(o.header, vec!["#!/bin/sh".to_string(), "set -e".to_string()]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let e = ScriptOptions::new().prefix("a/b").validate().unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
        assert!(ScriptOptions::new().suffix("/x").validate().is_err());
        assert!(ScriptOptions::new().max_attempts(0).validate().is_err());
        let e = ScriptOptions::new()
            .header_line("set -e\nrm -rf /")
            .validate()
            .unwrap_err();
        assert!(e.to_string().contains("header line 0"), "{e}");
    }
}
