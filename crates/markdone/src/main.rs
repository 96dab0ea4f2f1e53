// SPDX-FileCopyrightText: 2026 Markdone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdone - a reaction-confirmed Telegram task-capture bot.
//!
//! This is the binary entry point.

use clap::{Parser, Subcommand};

mod serve;
mod shutdown;

/// Markdone - a reaction-confirmed Telegram task-capture bot.
#[derive(Parser, Debug)]
#[command(name = "markdone", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match markdone_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            markdone_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(err) = serve::run_serve(config).await {
                eprintln!("markdone serve: {err}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(err) => {
                eprintln!("markdone config: failed to render: {err}");
                std::process::exit(1);
            }
        },
        None => {
            println!("markdone: use --help for available commands");
        }
    }
}
