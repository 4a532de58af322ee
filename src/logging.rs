use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the event filter: `--verbose` forces debug, otherwise `RUST_LOG` wins.
pub fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a stderr fmt subscriber for the binary. Library code never calls this.
///
/// Returns false when a global subscriber was already set.
pub fn init_tracing(verbose: bool) -> bool {
    let ok = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if !ok {
        eprintln!("overlay-script: tracing init skipped (global subscriber already set)");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_verbose_filter_is_debug() {
        assert_eq!(build_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
