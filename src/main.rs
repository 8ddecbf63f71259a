use anyhow::Result;
use clap::Parser;

use site_navigator::app;
use site_navigator::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    app::run(cli).await?;
    Ok(())
}
