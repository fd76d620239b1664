//! # provider-kit
//!
//! Resolves base URLs and API keys for OpenAI-compatible LLM providers from layered
//! configuration, assembles their model catalogs (static entries merged with each
//! provider's live `/models` listing), and binds model handles.

mod cli;
mod core;
mod run;

use clap::Parser;
use dotenv::dotenv;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);
    run::run(args).await;
}
