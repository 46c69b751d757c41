use std::sync::Arc;

use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use styler_cli::facets_cmd::FacetsArgs;
use styler_cli::list_cmd::ListArgs;
use styler_cli::show_cmd::ShowArgs;
use styler_core::DataSource;
use styler_core::Dataset;
use styler_core::ExplorerConfig;
use styler_tui::Cli as TuiCli;
use styler_tui::TuiOptions;
use tracing_subscriber::EnvFilter;

/// Styler experiments explorer.
///
/// Without a subcommand the interactive terminal explorer starts.
#[derive(Debug, Parser)]
#[clap(author, version, subcommand_negates_reqs = true, bin_name = "styler")]
struct MultitoolCli {
    #[clap(flatten)]
    interactive: TuiCli,

    #[clap(subcommand)]
    subcommand: Option<Subcommand>,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Open the terminal explorer (default).
    Tui(TuiOptions),

    /// Print the errors passing the given facet filters.
    List(ListArgs),

    /// Print the classification taxonomy with per-facet counts.
    Facets(FacetsArgs),

    /// Print one error with its source and repair diffs.
    Show(ShowArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let MultitoolCli {
        mut interactive,
        subcommand,
    } = MultitoolCli::parse();

    match subcommand {
        None => run_tui(interactive).await,
        Some(Subcommand::Tui(options)) => {
            interactive.options = options;
            run_tui(interactive).await
        }
        Some(Subcommand::List(args)) => {
            let (config, _, dataset) = prepare(&interactive).await?;
            let mut stdout = std::io::stdout().lock();
            styler_cli::list_cmd::run(&dataset, &args, config.match_mode, &mut stdout)
        }
        Some(Subcommand::Facets(args)) => {
            let (_, _, dataset) = prepare(&interactive).await?;
            styler_cli::facets_cmd::run(&dataset, &args, &mut std::io::stdout().lock())
        }
        Some(Subcommand::Show(args)) => {
            let (_, source, dataset) = prepare(&interactive).await?;
            let mut stdout = std::io::stdout().lock();
            styler_cli::show_cmd::run(source.as_ref(), &dataset, &args, &mut stdout).await
        }
    }
}

/// Logging to stderr, config and the loaded dataset for the scripted commands.
async fn prepare(cli: &TuiCli) -> Result<(ExplorerConfig, Arc<dyn DataSource>, Dataset)> {
    styler_cli::ensure_no_explorer_flags(&cli.options)?;
    init_logging();
    let config = styler_cli::load_config(cli)?;
    let (source, dataset) = styler_cli::load_dataset(&config).await?;
    Ok((config, source, dataset))
}

async fn run_tui(cli: TuiCli) -> Result<()> {
    styler_tui::run_main(cli)
        .await
        .map_err(|err| anyhow!("{err:?}"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("styler=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
