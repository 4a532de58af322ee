use std::path::PathBuf;

use clap::{Parser, Subcommand};

use overlay_script::{ExistingFile, ScriptOptions};

/// Validate an octal permission string such as 700 or 0o755.
fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0o");
    match u32::from_str_radix(digits, 8) {
        Ok(m) if m <= 0o7777 => Ok(m),
        _ => Err("must be an octal mode such as 700 or 0o755".to_string()),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "overlay-script",
    version,
    about = "Create shell scripts for overlay filesystem maintenance and append commands to them.",
    after_long_help = "Examples:\n  overlay-script create --shebang /bin/sh --errexit\n  overlay-script create --output ./undo.sh --existing append\n  overlay-script append --output ./undo.sh 'umount %q' /mnt/overlay\n\n"
)]
pub(crate) struct Cli {
    /// Print detailed execution info (forces debug logging)
    #[arg(long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Cmd {
    /// Create a script and print its path
    Create {
        /// Persistent script path; when omitted a unique temp file is generated
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Directory for generated scripts (default: host temp directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// File-name prefix for generated scripts
        #[arg(long, default_value = overlay_script::script::options::DEFAULT_PREFIX)]
        prefix: String,
        /// File-name suffix for generated scripts
        #[arg(long, default_value = overlay_script::script::options::DEFAULT_SUFFIX)]
        suffix: String,
        /// What to do when --output already exists
        #[arg(long, value_enum, default_value_t = ExistingFile::Truncate)]
        existing: ExistingFile,
        /// Write '#!<INTERP>' as the first line
        #[arg(long, value_name = "INTERP")]
        shebang: Option<String>,
        /// Write 'set -e' after the shebang
        #[arg(long)]
        errexit: bool,
        /// Make the script executable by its owner (mode 700)
        #[arg(long, conflicts_with = "mode")]
        executable: bool,
        /// Explicit octal permission bits
        #[arg(long, value_parser = parse_mode)]
        mode: Option<u32>,
    },
    /// Append one formatted command to an existing script
    Append {
        /// Script to extend (created if missing)
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// printf-style template: %s %d %i %u %q %%
        template: String,
        /// Template arguments, in order
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print build information
    Info,
}

impl Cmd {
    /// Map `create` flags onto initializer options.
    pub(crate) fn script_options(&self) -> ScriptOptions {
        match self {
            Cmd::Create {
                dir,
                prefix,
                suffix,
                existing,
                shebang,
                errexit,
                executable,
                mode,
                ..
            } => {
                let mut opts = ScriptOptions::new()
                    .prefix(prefix.clone())
                    .suffix(suffix.clone())
                    .existing(*existing);
                if let Some(d) = dir {
                    opts = opts.dir(d.clone());
                }
                if let Some(interp) = shebang {
                    opts = opts.shebang(interp);
                }
                if *errexit {
                    opts = opts.header_line("set -e");
                }
                if *executable {
                    opts = opts.mode(0o700);
                } else if let Some(m) = mode {
                    opts = opts.mode(*m);
                }
                opts
            }
            Cmd::Append { .. } => ScriptOptions::new().existing(ExistingFile::Append),
            Cmd::Info => ScriptOptions::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_accepts_octal_forms() {
        assert_eq!(parse_mode("700"), Ok(0o700));
        assert_eq!(parse_mode("0o755"), Ok(0o755));
        assert!(parse_mode("9").is_err());
        assert!(parse_mode("77777").is_err());
    }

    #[test]
    fn test_create_flags_map_to_options() {
        let cli = Cli::parse_from([
            "overlay-script",
            "create",
            "--dir",
            "/var/tmp",
            "--shebang",
            "/bin/sh",
            "--errexit",
            "--executable",
        ]);
        let opts = cli.command.script_options();
        assert_eq!(opts.dir, Some(PathBuf::from("/var/tmp")));
        assert_eq!(opts.header, vec!["#!/bin/sh".to_string(), "set -e".to_string()]);
        assert_eq!(opts.mode, Some(0o700));
        assert_eq!(opts.prefix, "overlay-tools-");
    }

    #[test]
    fn test_append_collects_hyphenated_args() {
        let cli = Cli::parse_from([
            "overlay-script",
            "append",
            "-o",
            "undo.sh",
            "rm %s %q",
            "--",
            "-rf",
            "/mnt/a b",
        ]);
        match cli.command {
            Cmd::Append { ref template, ref args, .. } => {
                assert_eq!(template, "rm %s %q");
                assert_eq!(args, &vec!["-rf".to_string(), "/mnt/a b".to_string()]);
            }
            ref other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.command.script_options().existing, ExistingFile::Append);
    }
}
