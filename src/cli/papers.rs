//! List the papers assigned to an annotator

use crate::dataset::Dataset;
use crate::models::EvalConfig;
use crate::store::ResultsStore;
use crate::Result;
use colored::Colorize;

pub fn run(config: &EvalConfig, user: &str) -> Result<()> {
    let dataset = Dataset::load(config)?;
    if !dataset.has_user(user) {
        anyhow::bail!("User '{}' is not on the annotator roster", user);
    }

    let papers = dataset.papers_for(user);
    if papers.is_empty() {
        println!("{}", "⚠ No papers assigned to this user.".yellow());
        return Ok(());
    }

    let rated = ResultsStore::new(config.results_path.clone()).rated_papers(user)?;

    println!("{}", format!("📜 Papers for {}", user).cyan().bold());
    for paper in &papers {
        if rated.contains(paper) {
            println!("  {} {}", "✓".green(), paper);
        } else {
            println!("  {} {}", "•".bright_black(), paper);
        }
    }
    Ok(())
}
