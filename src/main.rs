mod classify;
mod cli;
mod config;
mod download;
mod error;
mod explain;
mod export;
mod init;
mod progress;
mod source;
mod status;
mod terminal;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("{} {}", "Warning:".bold().yellow(), err);
    }

    let result = match cli.command {
        Commands::Export {
            config,
            source,
            output_dir,
            choice,
            no_fallback,
            technical_details,
            diagnostics,
        } => export::execute(export::ExportOptions {
            config,
            source,
            output_dir,
            choice: choice.map(Into::into),
            no_fallback,
            technical_details,
            diagnostics,
        }),
        Commands::Status { config } => status::execute(config),
        Commands::Init { path, force } => init::execute(path, force),
        Commands::Explain { code } => explain::execute(code),
        Commands::Classify {
            message,
            status,
            context,
            json,
        } => classify::execute(message, status, context, json),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
