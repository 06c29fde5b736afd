//! WaSSI CLI - weights, disaggregation and water supply stress indices.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wassi-cli",
    version,
    about = "Water Supply Stress Index toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wassi_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("wassi-cli {}", env!("CARGO_PKG_VERSION"));
    wassi_cmd::run(cli.command)
}
