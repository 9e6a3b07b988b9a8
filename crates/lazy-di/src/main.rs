//! lazy-di - Entry Point
//!
//! Binary entry point for the registry inspection tool. Command handling
//! lives in [`lazy_di::cli`].

use clap::Parser;
use lazy_di::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
