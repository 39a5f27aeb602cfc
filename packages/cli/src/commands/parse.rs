use crate::config::{resolve_path, Config};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// HTML file to parse
    pub file: String,

    /// Output format (json, html)
    #[arg(short, long, default_value = "json")]
    pub format: String,
}

pub fn parse(args: ParseArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let registry = config.registry()?;
    let path = resolve_path(cwd, &args.file);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;

    let doc = registry.parse_html(&source, &config.sanitizer());

    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&doc)?,
        "html" => registry.to_html(&doc)?,
        other => return Err(anyhow!("Unknown format: {}. Use: json or html", other)),
    };
    println!("{}", output);

    eprintln!(
        "{} {} top-level blocks",
        "✓".green(),
        doc.child_count().to_string().bright_white()
    );
    Ok(())
}
