use clap::Parser;
use styler_tui::Cli;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let cli = Cli::parse();
    styler_tui::run_main(cli).await
}
