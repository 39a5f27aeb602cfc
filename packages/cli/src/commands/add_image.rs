use crate::config::{resolve_path, Config};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{Dispatch, Editor, EditorState, Selection};
use serde_json::json;
use std::fs;

#[derive(Debug, Args)]
pub struct AddImageArgs {
    /// HTML file to edit
    pub file: String,

    /// Image URL
    #[arg(long)]
    pub src: String,

    /// Alternative text
    #[arg(long)]
    pub alt: Option<String>,

    #[arg(long)]
    pub width: Option<String>,

    #[arg(long)]
    pub height: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<String>,
}

pub fn add_image(args: AddImageArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve_path(cwd, &args.file);
    let source =
        fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;

    let state = EditorState::from_html(config.registry()?, &source, &config.sanitizer())?;
    let mut editor = Editor::new(state).with_history_limit(config.history_limit);

    let end = editor.state().end_position();
    let tr = editor.state().tr().set_selection(Selection::cursor(end));
    editor.dispatch(tr)?;

    let payload = json!({
        "imageUrl": args.src,
        "altText": args.alt,
        "width": args.width,
        "height": args.height,
    });
    if !editor.execute("addImage", &payload) {
        return Err(anyhow!("Image could not be inserted at the end of the document"));
    }

    let html = editor.state().to_html()?;
    match args.out {
        Some(out) => {
            let out_path = resolve_path(cwd, &out);
            fs::write(&out_path, &html)?;
            eprintln!("{} Wrote {}", "✓".green(), out_path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}
