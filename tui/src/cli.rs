use std::path::PathBuf;

use clap::Parser;
use styler_core::ConfigOverrides;
use styler_core::MatchMode;

/// Browse checkstyle errors and the repair tools that did or did not fix them.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Base URL or directory holding `data/classification.json` and `data/all.json`.
    #[arg(long, short = 'd', value_name = "URL_OR_DIR", global = true)]
    pub data: Option<String>,

    /// Config file to read instead of `$STYLER_HOME/config.toml`.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: TuiOptions,
}

/// Options of the interactive explorer itself.
#[derive(clap::Args, Debug, Clone)]
pub struct TuiOptions {
    /// Location to open at startup, e.g. `/error/spoon/12`.
    #[arg(long, default_value = "/")]
    pub route: String,

    /// Skip the welcome overlay.
    #[arg(long = "no-welcome")]
    pub no_welcome: bool,

    /// Whether a record must carry all active facets or any of them.
    #[arg(long = "match", value_name = "all|any")]
    pub match_mode: Option<MatchMode>,

    /// Log page views, shortcuts and filter clicks under the `analytics` target.
    #[arg(long)]
    pub analytics: bool,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            route: "/".to_string(),
            no_welcome: false,
            match_mode: None,
            analytics: false,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data: self.data.clone(),
            match_mode: self.options.match_mode,
            show_welcome: self.options.no_welcome.then_some(false),
            analytics: self.options.analytics.then_some(true),
        }
    }
}
