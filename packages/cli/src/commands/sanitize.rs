use crate::config::{resolve_path, Config};
use anyhow::{Context, Result};
use clap::Args;
use folio_dom::sanitize_html;
use std::fs;

#[derive(Debug, Args)]
pub struct SanitizeArgs {
    /// HTML file to sanitize
    pub file: String,
}

pub fn sanitize(args: SanitizeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve_path(cwd, &args.file);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;

    let fragment = sanitize_html(&source, &config.sanitizer());
    println!("{}", fragment.to_html());
    Ok(())
}
