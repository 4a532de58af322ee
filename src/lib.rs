//! Script builder for overlay filesystem tooling.
//!
//! Create a script at a generated temporary path or at a fixed path, then
//! append printf-style command lines to it:
//!
//! ```no_run
//! use overlay_script::{command, create_shell_script, ScriptOptions, ScriptTarget};
//!
//! # fn main() -> Result<(), overlay_script::ScriptError> {
//! let mut script = create_shell_script(&ScriptTarget::Generate, &ScriptOptions::default())?;
//! command!(script, "mount %s %s", "/dev/loop0", "/mnt/overlay")?;
//! command!(script, "umount %s", "/mnt/overlay")?;
//! let path = script.finish()?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod logging;
pub mod script;
pub mod util;

pub use errors::{exit_code_for_error, ScriptError, TemplateError};
pub use script::{
    command, create_shell_script, create_shell_script_with, ExistingFile, NameSource,
    RandomNames, ScriptHandle, ScriptOptions, ScriptOrigin, ScriptTarget, SequentialNames,
};
pub use util::{shell_escape, CommandLine};

/// Append one formatted command to a script handle.
///
/// `command!(script, "umount %s", mountpoint)` is shorthand for
/// `script.command(&CommandLine::new("umount %s").arg(mountpoint))` and
/// returns the number of bytes written.
#[macro_export]
macro_rules! command {
    ($script:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $script.command(&$crate::CommandLine::new($template)$(.arg($arg))*)
    };
}
