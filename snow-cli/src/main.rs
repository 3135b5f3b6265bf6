//! Snow CLI - render the resort conditions and forecast sheets from the terminal.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "snow-cli",
    version,
    about = "Colorado ski resort snow report toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: snow_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    snow_cmd::run(cli.command).await
}
