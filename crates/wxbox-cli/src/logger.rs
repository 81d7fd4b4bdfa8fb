//! Logging setup for the `wxbox` binary.
//!
//! Logs go to stderr so stdout stays reserved for the JSON the commands
//! print.
//!
//! # Example
//!
//! ```rust,no_run
//! use tracing::info;
//! use wxbox_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! info!("synthesizing configuration");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "wxbox_browsers=debug,wxbox_preset=debug,wxbox_config=debug,wxbox_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "wxbox_browsers=info,wxbox_preset=info,wxbox_config=info,wxbox_cli=info";

/// Filter for the given flags.
///
/// Order: `--verbose`, then `--quiet`, then `RUST_LOG`, then info for wxbox crates.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// # Arguments
///
/// * `verbose` - Debug level for the wxbox crates (takes precedence over `quiet`)
/// * `quiet` - Errors only
/// * `no_color` - Disable ANSI colors even on a capable terminal
///
/// Without either flag, `RUST_LOG` is honored and the fallback is info for
/// the wxbox crates. See [`filter_for`].
///
/// # Examples
///
/// ```rust,no_run
/// use wxbox_cli::logger::init_logger;
///
/// // Debug output, no colors (CI logs)
/// init_logger(true, false, true);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}

/// Whether stderr should get ANSI colors.
///
/// `NO_COLOR` disables and `FORCE_COLOR` forces; otherwise the terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn no_color_wins_over_force_color() {
        // SAFETY: serialized with every other env-mutating test.
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_colors());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
        assert!(should_use_colors());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    fn filters_parse() {
        let verbose = filter_for(true, false).to_string();
        assert!(verbose.contains("wxbox_config=debug"));
        assert_eq!(filter_for(false, true).to_string(), "error");
    }
}
