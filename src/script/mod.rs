//! Script initializer and command appender.
//!
//! A script is created either at a generated, collision-free temporary path or
//! at a path chosen by the caller. The returned [`ScriptHandle`] owns the file
//! and reports its path; commands are appended one line at a time in call
//! order. Closing, executing and deleting the script are left to the caller.
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::{ScriptError, TemplateError};
use crate::util::{has_line_break, CommandLine};

pub mod names;
pub mod options;

pub use names::{NameSource, RandomNames, SequentialNames};
pub use options::{ExistingFile, ScriptOptions};

/// Where the script should live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTarget {
    /// Synthesize a unique path in the temp directory.
    Generate,
    /// Open exactly this path.
    Fixed(PathBuf),
}

impl ScriptTarget {
    pub fn fixed(path: impl Into<PathBuf>) -> Self {
        ScriptTarget::Fixed(path.into())
    }
}

impl From<Option<PathBuf>> for ScriptTarget {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => ScriptTarget::Fixed(p),
            None => ScriptTarget::Generate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOrigin {
    Generated,
    Fixed,
}

/// An open script bound to exactly one path.
#[derive(Debug)]
pub struct ScriptHandle<W: Write = File> {
    writer: W,
    path: PathBuf,
    origin: ScriptOrigin,
}

impl<W: Write> ScriptHandle<W> {
    /// Wrap an arbitrary writer; `path` is only used for reporting.
    pub fn from_writer(writer: W, path: impl Into<PathBuf>, origin: ScriptOrigin) -> Self {
        Self {
            writer,
            path: path.into(),
            origin,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> ScriptOrigin {
        self.origin
    }

    pub fn is_generated(&self) -> bool {
        self.origin == ScriptOrigin::Generated
    }

    /// Render `line` and append it. Returns the bytes written, newline included.
    pub fn command(&mut self, line: &CommandLine) -> Result<usize, ScriptError> {
        let rendered = line.render()?;
        self.write_line(&rendered)
    }

    /// Append an already-rendered line.
    pub fn write_line(&mut self, line: &str) -> Result<usize, ScriptError> {
        if has_line_break(line) {
            return Err(TemplateError::EmbeddedNewline.into());
        }
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        self.writer
            .write_all(buf.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| ScriptError::io(&self.path, e))?;

        trace!(path = %self.path.display(), bytes = buf.len(), "appended script line");
        Ok(buf.len())
    }

    /// Flush and give back the script path, closing the writer.
    pub fn finish(mut self) -> Result<PathBuf, ScriptError> {
        self.writer
            .flush()
            .map_err(|e| ScriptError::io(&self.path, e))?;
        Ok(self.path)
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ScriptHandle<File> {
    /// Force written lines to stable storage.
    pub fn sync(&self) -> Result<(), ScriptError> {
        self.writer
            .sync_all()
            .map_err(|e| ScriptError::io(&self.path, e))
    }
}

/// Append one rendered command line to `script`.
pub fn command<W: Write>(
    script: &mut ScriptHandle<W>,
    line: &CommandLine,
) -> Result<usize, ScriptError> {
    script.command(line)
}

/// Create a script using OS randomness for generated names.
pub fn create_shell_script(
    target: &ScriptTarget,
    options: &ScriptOptions,
) -> Result<ScriptHandle, ScriptError> {
    create_shell_script_with(target, options, &mut RandomNames)
}

/// Create a script, drawing generated names from `names`.
pub fn create_shell_script_with<N: NameSource + ?Sized>(
    target: &ScriptTarget,
    options: &ScriptOptions,
    names: &mut N,
) -> Result<ScriptHandle, ScriptError> {
    let report_path = match target {
        ScriptTarget::Generate => options.temp_dir(),
        ScriptTarget::Fixed(p) => p.clone(),
    };
    options
        .validate()
        .map_err(|e| ScriptError::creation(&report_path, e))?;

    let (file, path, origin) = match target {
        ScriptTarget::Generate => {
            let (file, path) = create_unique(options, names)?;
            (file, path, ScriptOrigin::Generated)
        }
        ScriptTarget::Fixed(path) => {
            let file = open_fixed(path, options)?;
            (file, path.clone(), ScriptOrigin::Fixed)
        }
    };

    apply_mode(&file, &path, options)?;
    let empty = file
        .metadata()
        .map(|m| m.len() == 0)
        .map_err(|e| ScriptError::creation(&path, e))?;

    let mut handle = ScriptHandle::from_writer(file, path, origin);
    if empty {
        for line in &options.header {
            handle.write_line(line)?;
        }
    }

    debug!(
        path = %handle.path().display(),
        origin = ?origin,
        header_lines = if empty { options.header.len() } else { 0 },
        "script created"
    );
    Ok(handle)
}

fn base_open_options(options: &ScriptOptions) -> OpenOptions {
    let mut oo = OpenOptions::new();
    oo.write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = options.mode {
            oo.mode(mode);
        }
    }
    #[cfg(not(unix))]
    let _ = options;
    oo
}

fn create_unique<N: NameSource + ?Sized>(
    options: &ScriptOptions,
    names: &mut N,
) -> Result<(File, PathBuf), ScriptError> {
    let dir = options.temp_dir();

    for attempt in 1..=options.max_attempts {
        let name = names
            .next_name()
            .map_err(|e| ScriptError::creation(&dir, e))?;
        if name.is_empty() || name.chars().any(|c| c == '/' || c == std::path::MAIN_SEPARATOR) {
            return Err(ScriptError::creation(
                &dir,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("name source produced an unusable name {name:?}"),
                ),
            ));
        }

        let path = dir.join(format!("{}{}{}", options.prefix, name, options.suffix));
        match base_open_options(options).create_new(true).open(&path) {
            Ok(f) => return Ok((f, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), attempt, "script name taken; retrying");
            }
            Err(e) => return Err(ScriptError::creation(path, e)),
        }
    }

    Err(ScriptError::creation(
        dir,
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "no unique script name after {} attempts",
                options.max_attempts
            ),
        ),
    ))
}

fn open_fixed(path: &Path, options: &ScriptOptions) -> Result<File, ScriptError> {
    if path.as_os_str().is_empty() {
        return Err(ScriptError::creation(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "empty script path"),
        ));
    }

    let mut oo = base_open_options(options);
    match options.existing {
        ExistingFile::Truncate => oo.create(true).truncate(true),
        ExistingFile::Append => oo.create(true).append(true),
        ExistingFile::CreateNew => oo.create_new(true),
    };
    oo.open(path).map_err(|e| ScriptError::creation(path, e))
}

#[cfg(unix)]
fn apply_mode(file: &File, path: &Path, options: &ScriptOptions) -> Result<(), ScriptError> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    // open() honours the umask and leaves existing files alone; set explicitly
    if let Some(mode) = options.mode {
        file.set_permissions(Permissions::from_mode(mode))
            .map_err(|e| ScriptError::creation(path, e))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_file: &File, _path: &Path, _options: &ScriptOptions) -> Result<(), ScriptError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Repeat(&'static str);

    impl NameSource for Repeat {
        fn next_name(&mut self) -> io::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_target_from_option() {
        assert_eq!(ScriptTarget::from(None), ScriptTarget::Generate);
        assert_eq!(
            ScriptTarget::from(Some(PathBuf::from("/tmp/fixed.sh"))),
            ScriptTarget::fixed("/tmp/fixed.sh")
        );
    }

    #[test]
    fn test_generate_uses_prefix_name_suffix() {
        let td = tempfile::tempdir().expect("tmpdir");
        let opts = ScriptOptions::new().dir(td.path()).prefix("undo-").suffix(".bash");
        let mut names = SequentialNames::new(0);
        let h = create_shell_script_with(&ScriptTarget::Generate, &opts, &mut names)
            .expect("create");
        assert_eq!(h.path(), td.path().join("undo-000000.bash"));
        assert!(h.is_generated());
    }

    #[test]
    fn test_collision_exhaustion_is_creation_error() {
        let td = tempfile::tempdir().expect("tmpdir");
        let opts = ScriptOptions::new().dir(td.path()).max_attempts(3);
        let mut names = Repeat("same");
        let _first = create_shell_script_with(&ScriptTarget::Generate, &opts, &mut names)
            .expect("first");
        let err = create_shell_script_with(&ScriptTarget::Generate, &opts, &mut names).unwrap_err();
        assert!(err.is_creation(), "{err:?}");
        assert_eq!(err.io_kind(), Some(io::ErrorKind::AlreadyExists));
        let cause = std::error::Error::source(&err).expect("source").to_string();
        assert!(cause.contains("after 3 attempts"), "{cause}");
    }

    #[test]
    fn test_unusable_name_rejected() {
        let td = tempfile::tempdir().expect("tmpdir");
        let opts = ScriptOptions::new().dir(td.path());
        let err = create_shell_script_with(&ScriptTarget::Generate, &opts, &mut Repeat("../x"))
            .unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::InvalidInput));
    }

    #[test]
    fn test_write_line_rejects_line_breaks() {
        let mut h = ScriptHandle::from_writer(Vec::new(), "mem.sh", ScriptOrigin::Fixed);
        let err = h.write_line("a\nb").unwrap_err();
        assert!(matches!(err, ScriptError::Template(TemplateError::EmbeddedNewline)));
        assert_eq!(h.write_line("sync").unwrap(), 5);
        assert_eq!(h.into_inner(), b"sync\n".to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_applied_to_generated_script() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempfile::tempdir().expect("tmpdir");
        let opts = ScriptOptions::new().dir(td.path()).mode(0o700);
        let h = create_shell_script(&ScriptTarget::Generate, &opts).expect("create");
        let mode = std::fs::metadata(h.path()).expect("stat").permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
