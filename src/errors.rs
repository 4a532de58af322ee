//! Error mapping guide:
//! - `Creation` covers everything that prevents a script file from being opened.
//! - `Io` covers writes through an already-open handle (header or command lines).
//! - `Template` is raised before any byte is written.
//! - Exit codes follow sysexits: 65 data, 73 cannot create, 74 I/O.
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures raised while creating or appending to a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The destination could not be created or opened.
    #[error("cannot create script {}", .path.display())]
    Creation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write through an open handle failed; the script must be treated as corrupt.
    #[error("write to script {} failed", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl ScriptError {
    pub(crate) fn creation(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScriptError::Creation {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        ScriptError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(self, ScriptError::Creation { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, ScriptError::Io { .. })
    }

    /// Underlying OS error kind, when there is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ScriptError::Creation { source, .. } | ScriptError::Io { source, .. } => {
                Some(source.kind())
            }
            ScriptError::Template(_) => None,
        }
    }
}

/// Call-site validation failures for a command template and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template expects {expected} argument(s), got {given}")]
    ArgumentCount { expected: usize, given: usize },

    #[error("unsupported placeholder '%{0}' in template")]
    UnknownPlaceholder(char),

    #[error("template ends with a dangling '%'")]
    DanglingPercent,

    #[error("argument {index} for '%{placeholder}' is not an integer: {value:?}")]
    NotAnInteger {
        index: usize,
        placeholder: char,
        value: String,
    },

    #[error("rendered command contains a newline or NUL; use atomic lines")]
    EmbeddedNewline,
}

/// Map a script error to a process exit code.
pub fn exit_code_for_error(e: &ScriptError) -> u8 {
    match e {
        ScriptError::Template(_) => 65,
        ScriptError::Creation { .. } => 73,
        ScriptError::Io { .. } => 74,
    }
}
