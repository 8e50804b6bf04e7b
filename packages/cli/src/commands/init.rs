use anyhow::Result;
use clap::Args;
use colored::Colorize;
use scribe_paste::{PasteConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Host cannot read pasted HTML synchronously
    #[arg(long)]
    pub lacks_sync_html: bool,

    /// Paste everything as plain text
    #[arg(long)]
    pub strip_styles: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Writing paste configuration...".bright_blue().bold());

    let config = PasteConfig {
        lacks_sync_html: args.lacks_sync_html,
        strip_pasted_styles: args.strip_styles,
        ..Default::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Record a clipboard as JSON (types, data, files)");
    println!("  2. Run: scribe paste --document doc.json --payload clipboard.json");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                lacks_sync_html: true,
                strip_styles: false,
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = PasteConfig::load(dir.path()).unwrap();
        assert!(config.lacks_sync_html);
        assert!(!config.strip_pasted_styles);
        assert!(config.legacy_vendor_archive);
    }
}
