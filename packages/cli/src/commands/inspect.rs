use super::{read_json, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use scribe_paste::{ClipboardPayload, PasteContext, RawClipboard};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Recorded clipboard JSON
    pub payload: PathBuf,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let path = resolve(cwd, &args.payload);
    let clipboard: RawClipboard = read_json(&path)?;
    let payload = ClipboardPayload::from_handle(&clipboard);
    let context = PasteContext::from_payload(&payload);

    println!("{}", "🔍 Clipboard payload".bright_blue().bold());
    println!("  kind:       {:?}", payload.kind());
    println!("  rich text:  {}", yes_no(payload.is_rich_text()));
    println!("  type list:  {}", yes_no(payload.has_type_list()));
    println!("  files:      {}", payload.files().len());

    match context.text() {
        Some(text) => println!("  text:       {} chars", text.chars().count()),
        None => println!("  text:       {}", "none".dimmed()),
    }

    match (payload.html(), context.html()) {
        (Some(_), None) => println!("  html:       {}", "echoes text, ignored".yellow()),
        (Some(html), Some(_)) => println!("  html:       {} bytes", html.len()),
        (None, _) => println!("  html:       {}", "unavailable".dimmed()),
    }

    if context.via_vendor_archive() {
        println!("  {} only the vendor archive type was advertised", "⚠️".yellow());
    }

    Ok(())
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red()
    }
}
