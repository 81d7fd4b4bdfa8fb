//! Command implementations.

use std::io::Write;
use std::path::Path;

use tracing::info;
use wxbox_browsers::{BrowserslistDataset, VendorId, VersionResolver, VersionSpec};
use wxbox_config::ConfigSynthesizer;
use wxbox_preset::BuildContext;

use crate::cli::{ConfigArgs, LatestArgs, TargetArgs, TargetSelection};
use crate::config::load_options;
use crate::error::Result;

fn dataset_for(project_dir: Option<&Path>) -> BrowserslistDataset {
    match project_dir {
        Some(dir) => BrowserslistDataset::new().with_project_dir(dir),
        None => BrowserslistDataset::new(),
    }
}

fn print_line(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// `wxbox config`
pub fn config_execute(args: ConfigArgs) -> Result<()> {
    let options = load_options(&args)?;

    // One synthesis per process, so the mode can be published for tooling
    // layered on top of the build.
    let context = BuildContext::detect(options.dev);
    context.mode.export_env();

    let project_dir = options.base_dir()?;
    let synthesizer = ConfigSynthesizer::new(dataset_for(Some(&project_dir)));
    let config = synthesizer.synthesize_with(context, &options)?;

    let json = if args.compact {
        serde_json::to_string(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    print_line(&json)
}

fn selection(target: &TargetSelection) -> (VendorId, VersionSpec) {
    let vendor = target
        .vendor
        .as_deref()
        .map(VendorId::new)
        .unwrap_or_default();
    let spec = VersionSpec::parse(target.vendor_version.as_deref());
    (vendor, spec)
}

/// `wxbox target`
pub fn target_execute(args: TargetArgs) -> Result<()> {
    let (vendor, spec) = selection(&args.target);
    let resolver = VersionResolver::new(dataset_for(args.cwd.as_deref()));
    let target = resolver.target_by_vendor(&vendor, &spec)?;
    info!(%vendor, %spec, %target, "resolved target");
    print_line(&target)
}

/// `wxbox latest`
pub fn latest_execute(args: LatestArgs) -> Result<()> {
    let vendor = VendorId::new(&args.vendor);
    let resolver = VersionResolver::new(BrowserslistDataset::new());
    let version = resolver.latest_version(&vendor)?;
    print_line(&version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_defaults_to_latest_chrome() {
        let (vendor, spec) = selection(&TargetSelection::default());
        assert_eq!(vendor, VendorId::chrome());
        assert_eq!(spec, VersionSpec::Latest);
    }

    #[test]
    fn selection_parses_requests() {
        let (vendor, spec) = selection(&TargetSelection {
            vendor: Some("Firefox".into()),
            vendor_version: Some("AUTO".into()),
        });
        assert_eq!(vendor, VendorId::firefox());
        assert_eq!(spec, VersionSpec::Auto);
    }
}
