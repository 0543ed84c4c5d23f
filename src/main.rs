use anyhow::Result;
use clap::Parser;

use futures_order::{
    cli::{normalize_args, Cli},
    settings::init_logger,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logger()?;
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    futures_order::run(cli).await?;
    Ok(())
}
