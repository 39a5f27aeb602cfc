mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add_image, init, parse, sanitize, AddImageArgs, InitArgs, ParseArgs, SanitizeArgs,
};

/// Folio CLI - sanitize, parse and edit rich-text HTML documents
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default folio.config.json
    Init(InitArgs),

    /// Print the sanitized markup of a file
    Sanitize(SanitizeArgs),

    /// Parse a file into a document tree
    Parse(ParseArgs),

    /// Append an image at the end of a document
    AddImage(AddImageArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Sanitize(args) => sanitize(args, &cwd),
                Command::Parse(args) => parse(args, &cwd),
                Command::AddImage(args) => add_image(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
