//! Write a default `revieweval.toml`

use crate::models::{EvalConfig, CONFIG_FILE_NAME};
use crate::Result;
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};

pub fn run(force: bool) -> Result<()> {
    let project_root = env::current_dir()?;

    match write_default_config(&project_root, force)? {
        Some(path) => {
            println!("{}", "✅ Configuration written".green().bold());
            println!("   {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Put user.csv, mapping.csv and the review files in ./data");
            println!("  2. Put <paper_id>.pdf files in ./pdfs");
            println!("  3. Run: revieweval serve");
        }
        None => {
            println!("{}", "⚠️  revieweval.toml already exists".yellow());
            println!("   Run with --force to overwrite");
        }
    }
    Ok(())
}

/// Write the default config into `dir`
///
/// Returns `None` when a config is already present and `force` is unset.
pub fn write_default_config(dir: &Path, force: bool) -> Result<Option<PathBuf>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Ok(None);
    }

    EvalConfig::default().save(&path)?;
    Ok(Some(path))
}
