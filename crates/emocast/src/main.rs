// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emocast - emotion estimation, keyphrase extraction, and campaign drafting.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Emocast - emotion estimation, keyphrase extraction, and campaign drafting.
#[derive(Parser, Debug)]
#[command(name = "emocast", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Run one pipeline stage and print the result as JSON.
    Compute {
        #[command(subcommand)]
        stage: ComputeCommand,
    },
    /// Manage brand records.
    Brand {
        #[command(subcommand)]
        action: BrandCommand,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ComputeCommand {
    /// Estimate emotions for a single message.
    Emotion {
        message: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Estimate one emotion profile for a set of messages.
    Unique {
        #[arg(required = true)]
        messages: Vec<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Extract keyphrases conditioned on one emotion.
    Keyphrase {
        #[arg(long)]
        emotion: String,
        #[arg(required = true)]
        messages: Vec<String>,
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum BrandCommand {
    /// Insert or replace a brand.
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Competitor URL; repeat for several.
        #[arg(long = "competitor")]
        competitors: Vec<String>,
        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate configuration and print the effective values.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => emocast_config::load_and_validate_path(path),
        None => emocast_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            emocast_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Compute { stage }) => {
            serve::init_tracing(&config.service.log_level);
            match stage {
                ComputeCommand::Emotion { message, user } => {
                    commands::compute_emotion(&config, &message, user).await
                }
                ComputeCommand::Unique { messages, user } => {
                    commands::compute_unique(&config, messages, user).await
                }
                ComputeCommand::Keyphrase {
                    emotion,
                    messages,
                    user,
                } => commands::compute_keyphrase(&config, messages, &emotion, user).await,
            }
        }
        Some(Commands::Brand {
            action:
                BrandCommand::Add {
                    id,
                    name,
                    description,
                    competitors,
                    owner,
                },
        }) => {
            let brand = commands::NewBrand {
                id,
                name,
                description,
                competitor_urls: competitors,
                owner_user_id: owner,
            };
            commands::add_brand(&config, brand).await
        }
        Some(Commands::Config {
            action: ConfigCommand::Check,
        }) => commands::config_check(&config),
        None => {
            println!("emocast: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("emocast: {e}");
        std::process::exit(1);
    }
}
