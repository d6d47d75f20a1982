// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trivet - trivia quiz question engine.
//!
//! This is the binary entry point for the Trivet CLI. It is a thin demo
//! caller around the question source; the chat transport lives elsewhere.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod ask;

/// Trivet - trivia quiz question engine.
#[derive(Parser, Debug)]
#[command(name = "trivet", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and print a single trivia question.
    Ask {
        /// Category key (e.g. general, science, history). Unknown keys mean
        /// "any category".
        #[arg(long, default_value = "general")]
        category: String,

        /// Difficulty (easy, medium, hard). Anything else means "any".
        #[arg(long, default_value = "easy")]
        difficulty: String,
    },
    /// List supported category keys.
    Categories,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match trivet_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            trivet_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.bot.log_level);

    let result = match cli.command {
        Some(Commands::Ask {
            category,
            difficulty,
        }) => ask::run_ask(config, &category, &difficulty).await,
        Some(Commands::Categories) => {
            for key in trivet_opentdb::supported_keys() {
                println!("{key}");
            }
            Ok(())
        }
        Some(Commands::Config) => match toml_render(&config) {
            Some(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            None => {
                eprintln!("trivet: failed to render configuration");
                std::process::exit(1);
            }
        },
        None => {
            println!("trivet: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("trivet: {e}");
        std::process::exit(1);
    }
}

fn toml_render(config: &trivet_config::TrivetConfig) -> Option<String> {
    toml::to_string_pretty(config).ok()
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "trivet={log_level},trivet_opentdb={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
