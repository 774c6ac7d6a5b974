//! Converter CLI main entry point

use anyhow::Result;
use clap::Parser;
use sentinel2yaral_cli::commands::{Cli, CommandExecutor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Execute the command
    let mut executor = CommandExecutor::new(&cli);
    let result = executor.execute(cli.command).await?;

    // Exit with appropriate code
    if result.success {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
