//! Scriptable access to the styler dataset: `list`, `facets` and `show`.

pub mod facets_cmd;
pub mod list_cmd;
mod output;
pub mod show_cmd;

use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use styler_core::DataSource;
use styler_core::Dataset;
use styler_core::ExplorerConfig;
use styler_core::config::CONFIG_FILE;
use styler_core::config::styler_home;
use styler_core::open_source;
use styler_core::store;
use styler_tui::TuiOptions;

pub use output::OutputFormat;

/// Config for the global `--data`/`--config` flags of `cli`.
pub fn load_config(cli: &styler_tui::Cli) -> Result<ExplorerConfig> {
    let home = styler_home()?;
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| home.join(CONFIG_FILE));
    ExplorerConfig::load_from(&path, &home, cli.overrides())
        .with_context(|| format!("failed to load config from {}", path.display()))
}

/// Fail on explorer-only flags given alongside a scripted command. `--match`
/// is shared and allowed.
pub fn ensure_no_explorer_flags(options: &TuiOptions) -> Result<()> {
    let defaults = TuiOptions::default();
    let mut given = Vec::new();
    if options.route != defaults.route {
        given.push("--route");
    }
    if options.no_welcome {
        given.push("--no-welcome");
    }
    if options.analytics {
        given.push("--analytics");
    }
    if !given.is_empty() {
        bail!("explorer-only flags given to a scripted command: {}", given.join(", "));
    }
    Ok(())
}

/// Open the configured data location and load the dataset from it.
pub async fn load_dataset(config: &ExplorerConfig) -> Result<(Arc<dyn DataSource>, Dataset)> {
    let source = open_source(&config.data, config.request_timeout)
        .with_context(|| format!("cannot open data location {}", config.data))?;
    let dataset = store::load(source.as_ref())
        .await
        .with_context(|| format!("failed to load dataset from {}", source.describe()))?;
    Ok((source, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_core::MatchMode;

    #[test]
    fn explorer_flags_are_rejected() {
        let options = TuiOptions {
            route: "/error/spoon/12".to_string(),
            analytics: true,
            ..TuiOptions::default()
        };
        let err = ensure_no_explorer_flags(&options).expect_err("route and analytics");
        assert_eq!(
            err.to_string(),
            "explorer-only flags given to a scripted command: --route, --analytics"
        );
    }

    #[test]
    fn match_mode_is_shared() {
        let options = TuiOptions {
            match_mode: Some(MatchMode::Any),
            ..TuiOptions::default()
        };
        assert!(ensure_no_explorer_flags(&options).is_ok());
    }
}
