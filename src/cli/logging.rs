//! Logging setup
//!
//! Diagnostics go to stderr so stdout stays clean for piping. `RUST_LOG`
//! wins over the `-v`/`-q` flags when it is set.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::GlobalOpts;

/// Default filter directive for the given verbosity flags
pub fn default_directive(global: &GlobalOpts) -> &'static str {
    if global.verbose {
        "warn,irt=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(verbose: bool, quiet: bool) -> GlobalOpts {
        GlobalOpts {
            store: None,
            quiet,
            verbose,
        }
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(&opts(true, false)), "warn,irt=debug");
        assert_eq!(default_directive(&opts(false, true)), "error");
        assert_eq!(default_directive(&opts(false, false)), "warn");
    }
}
