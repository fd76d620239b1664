//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  provider-kit providers                          List built-in providers
  provider-kit providers --json                   Provider descriptors as JSON
  provider-kit models                             Models of every enabled provider
  provider-kit models -p minimax --query text     Filter one provider's catalog
  provider-kit models -p minimax --json           Catalog as JSON
  provider-kit config -p openrouter               Show resolved base URL and key source
  provider-kit check -p minimax -m MiniMax-M1     Verify a model can be instantiated
  provider-kit completions bash                   Generate bash completions

CONFIGURATION (highest precedence first):
  --api-key / --base-url                          Values for this run only
  <config dir>/providers.json                     Persisted per-provider settings
  Environment (e.g. MINIMAX_API_KEY)              Also read from .env
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Resolve endpoints and model catalogs for OpenAI-compatible LLM providers",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List built-in providers and whether they are enabled
    Providers {
        /// Print provider descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// List models: static catalog merged with the provider's live listing
    Models {
        /// Only this provider (default: all enabled providers)
        #[arg(short, long)]
        provider: Option<String>,
        /// Filter models by id or label
        #[arg(long)]
        query: Option<String>,
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Show the resolved base URL and where the API key comes from
    Config {
        /// Only this provider (default: all providers)
        #[arg(short, long)]
        provider: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Instantiate a model handle without sending a request
    Check {
        #[arg(short, long)]
        provider: String,
        #[arg(short, long)]
        model: String,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

/// Explicit values for the selected provider, applied for this run only.
#[derive(clap::Args)]
pub struct Overrides {
    /// API key (takes precedence over settings and environment)
    #[arg(long, requires = "provider")]
    pub api_key: Option<String>,
    /// Base URL (takes precedence over settings and environment)
    #[arg(long, requires = "provider")]
    pub base_url: Option<String>,
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
