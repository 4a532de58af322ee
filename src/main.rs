use std::process::ExitCode;

use clap::Parser;

use overlay_script::{
    create_shell_script, exit_code_for_error, CommandLine, ScriptError, ScriptTarget,
};

mod cli;

use cli::{Cli, Cmd};

fn print_build_info() {
    println!("overlay-script info");
    println!("  version: v{}", env!("CARGO_PKG_VERSION"));
    println!("  host: {} / {}", std::env::consts::OS, std::env::consts::ARCH);
    println!("  target: {}", env!("OVERLAY_SCRIPT_BUILD_TARGET"));
    println!("  profile: {}", env!("OVERLAY_SCRIPT_BUILD_PROFILE"));
    println!("  rustc: {}", env!("OVERLAY_SCRIPT_BUILD_RUSTC"));
    println!("  built: {}", env!("OVERLAY_SCRIPT_BUILD_DATE"));
    println!("  temp dir: {}", std::env::temp_dir().display());
}

fn run(cli: &Cli) -> Result<(), ScriptError> {
    let options = cli.command.script_options();
    match &cli.command {
        Cmd::Create { output, .. } => {
            let target = ScriptTarget::from(output.clone());
            let script = create_shell_script(&target, &options)?;
            let path = script.finish()?;
            println!("{}", path.display());
        }
        Cmd::Append {
            output,
            template,
            args,
        } => {
            let mut script = create_shell_script(&ScriptTarget::fixed(output), &options)?;
            let line = CommandLine::new(template.as_str()).args(args);
            let written = script.command(&line)?;
            script.finish()?;
            if cli.verbose {
                eprintln!("overlay-script: appended {written} bytes to {}", output.display());
            }
        }
        Cmd::Info => print_build_info(),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    overlay_script::logging::init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code_for_error(&e);
            let report = anyhow::Error::new(e).context(match &cli.command {
                Cmd::Create { .. } => "overlay-script create failed",
                Cmd::Append { .. } => "overlay-script append failed",
                Cmd::Info => "overlay-script info failed",
            });
            eprintln!("{report:#}");
            ExitCode::from(code)
        }
    }
}
