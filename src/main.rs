use anyhow::Result;
use clap::Parser;
use vboxweb::{commands, logging, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    commands::run(cli).await
}
