//! Command-line interface definition.
//!
//! - `wxbox config` prints the synthesized bundler configuration
//! - `wxbox target` prints the compact target id (`chrome80`)
//! - `wxbox latest` prints the newest version the compatibility data knows

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bundler configuration for browser extensions
#[derive(Parser, Debug)]
#[command(
    name = "wxbox",
    version,
    about = "Bundler configuration for browser extensions",
    long_about = "wxbox resolves the browser version an extension build targets and\n\
                  synthesizes the bundler configuration (entries, transform rules and\n\
                  plugin chain) for it."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize the build configuration and print it as JSON
    ///
    /// Options are layered: built-in defaults, then wxbox.config.json,
    /// then WXBOX_* environment variables, then these flags.
    Config(ConfigArgs),

    /// Print the resolved target id, e.g. `chrome80`
    Target(TargetArgs),

    /// Print the newest known version of a vendor
    Latest(LatestArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Extension source directory [default: app]
    #[arg(long = "src", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Output directory; `[vendor]` is replaced by the vendor id [default: build/[vendor]]
    #[arg(long, value_name = "TEMPLATE")]
    pub output_dir: Option<String>,

    /// Directory for packaged archives [default: packages]
    #[arg(long, value_name = "TEMPLATE")]
    pub package_dir: Option<String>,

    /// Development build
    #[arg(long)]
    pub dev: bool,

    /// Glob excluded from the static copy (repeatable) [default: **/*.js, **/*.json]
    #[arg(long, value_name = "GLOB")]
    pub copy_ignore: Vec<String>,

    /// Source map mode passed to the bundler
    #[arg(long, value_name = "MODE")]
    pub devtool: Option<String>,

    /// Minify emitted bundles
    #[arg(long)]
    pub minimize: bool,

    #[command(flatten)]
    pub target: TargetSelection,

    /// Base directory for relative paths [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Options file [default: ./wxbox.config.json when present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Vendor and version request shared by several commands.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetSelection {
    /// Target browser vendor (chrome, firefox, opera, edge, ...) [default: chrome]
    #[arg(long, value_name = "VENDOR")]
    pub vendor: Option<String>,

    /// Version to target: a number, `auto`, or omitted for the latest
    #[arg(long, value_name = "SPEC")]
    pub vendor_version: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[command(flatten)]
    pub target: TargetSelection,

    /// Directory the browserslist config is looked up from
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct LatestArgs {
    /// Vendor to look up
    #[arg(value_name = "VENDOR")]
    pub vendor: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flags_parse() {
        let cli = Cli::try_parse_from([
            "wxbox",
            "config",
            "--src",
            "extension",
            "--vendor",
            "firefox",
            "--vendor-version",
            "auto",
            "--copy-ignore",
            "**/*.md",
            "--copy-ignore",
            "**/*.js",
            "--dev",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Config(args) = cli.command else {
            panic!("expected config command");
        };
        assert_eq!(args.source_dir, Some(PathBuf::from("extension")));
        assert_eq!(args.target.vendor.as_deref(), Some("firefox"));
        assert_eq!(args.target.vendor_version.as_deref(), Some("auto"));
        assert_eq!(args.copy_ignore, ["**/*.md", "**/*.js"]);
        assert!(args.dev);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["wxbox", "-v", "-q", "latest", "chrome"]).is_err());
    }
}
