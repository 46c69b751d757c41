//! Terminal front end of the styler explorer.

use std::path::Path;

use color_eyre::eyre::Result;
use color_eyre::eyre::WrapErr;
use styler_core::AnalyticsSink;
use styler_core::ExplorerConfig;
use styler_core::Route;
use styler_core::TracingSink;
use styler_core::config::CONFIG_FILE;
use styler_core::config::styler_home;
use styler_core::open_source;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod app;
mod app_event;
mod app_event_sender;
mod cli;
mod diff_render;
mod error_modal;
mod error_table;
mod filter_panel;
mod hint_bar;
mod keyboard;
mod render;
mod tui;
mod welcome;

pub use cli::Cli;
pub use cli::TuiOptions;

use crate::app::App;
use crate::app::AppInit;

const LOG_FILE: &str = "styler-tui.log";
const DEFAULT_LOG_FILTER: &str = "styler=info,analytics=info";

/// Resolve configuration from `cli`, then run the explorer until the user quits.
pub async fn run_main(cli: Cli) -> Result<()> {
    color_eyre::install()?;

    let config = load_config(&cli)?;
    // Logging must go to a file while the terminal is in raw mode.
    let _guard = init_logging(&config.log_dir())?;
    info!(data = %config.data, "starting styler explorer");

    let source = open_source(&config.data, config.request_timeout)
        .wrap_err_with(|| format!("cannot open data location {}", config.data))?;
    let analytics: Option<Box<dyn AnalyticsSink>> = if config.analytics {
        Some(Box::new(TracingSink))
    } else {
        None
    };
    let init = AppInit {
        source,
        match_mode: config.match_mode,
        show_welcome: config.show_welcome,
        route: Route::parse(&cli.options.route),
        analytics,
    };

    let mut terminal = tui::init()?;
    let result = App::run(&mut terminal, init).await;
    tui::restore()?;
    result
}

/// Config for `cli`: `--config` if given, else `$STYLER_HOME/config.toml`.
pub fn load_config(cli: &Cli) -> Result<ExplorerConfig> {
    let home = styler_home()?;
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| home.join(CONFIG_FILE));
    let config = ExplorerConfig::load_from(&path, &home, cli.overrides())
        .wrap_err("failed to load configuration")?;
    Ok(config)
}

fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("failed to create {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .wrap_err("failed to install tracing subscriber")?;
    Ok(guard)
}
