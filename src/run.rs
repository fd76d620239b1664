//! Application run modes: logger init and command dispatch.

use clap::CommandFactory;

use crate::cli::{self, Args, Commands};
use crate::core;
use crate::core::cli::CommandContext;

/// Initialize env_logger at the level chosen by -v/-q (RUST_LOG still wins).
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .try_init();
}

/// Dispatch the parsed command.
pub async fn run(args: Args) {
    match args.command {
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            cli::generate(shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
        }
        Commands::Providers { json } => core::cli::run_providers(&CommandContext::load(), json),
        Commands::Models {
            provider,
            query,
            json,
            overrides,
        } => {
            core::cli::run_models(
                &CommandContext::load(),
                provider.as_deref(),
                query.as_deref(),
                json,
                overrides.api_key,
                overrides.base_url,
            )
            .await
        }
        Commands::Config {
            provider,
            overrides,
        } => core::cli::run_config(
            &CommandContext::load(),
            provider.as_deref(),
            overrides.api_key,
            overrides.base_url,
        ),
        Commands::Check {
            provider,
            model,
            overrides,
        } => core::cli::run_check(
            &CommandContext::load(),
            &provider,
            &model,
            overrides.api_key,
            overrides.base_url,
        ),
    }
}
