//! Annotation progress per user

use crate::dataset::Dataset;
use crate::models::EvalConfig;
use crate::store::ResultsStore;
use crate::Result;
use colored::Colorize;
use serde::Serialize;

/// Rated versus assigned papers for one annotator
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProgress {
    pub user: String,
    pub assigned: usize,
    pub rated: usize,
}

impl UserProgress {
    pub fn is_complete(&self) -> bool {
        self.rated >= self.assigned
    }
}

/// Progress of every non-master user on the roster
pub fn collect_progress(dataset: &Dataset, store: &ResultsStore) -> Result<Vec<UserProgress>> {
    let mut progress = Vec::new();
    for user in dataset.users() {
        if dataset.is_master(user) {
            continue;
        }
        let assigned = dataset.papers_for(user);
        let rated = store.rated_papers(user)?;
        progress.push(UserProgress {
            user: user.clone(),
            assigned: assigned.len(),
            rated: assigned.iter().filter(|p| rated.contains(*p)).count(),
        });
    }
    Ok(progress)
}

pub fn run(config: &EvalConfig, json: bool) -> Result<()> {
    let dataset = Dataset::load(config)?;
    let store = ResultsStore::new(config.results_path.clone());
    let progress = collect_progress(&dataset, &store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
        return Ok(());
    }

    println!("{}", "📊 Annotation progress".cyan().bold());
    if progress.is_empty() {
        println!("  {}", "No annotators on the roster".bright_black());
        return Ok(());
    }

    for entry in &progress {
        let counts = format!("{}/{}", entry.rated, entry.assigned);
        let line = if entry.assigned == 0 {
            format!("  {:<20} {}", entry.user, "no papers assigned".bright_black())
        } else if entry.is_complete() {
            format!("  {:<20} {}", entry.user, counts.green())
        } else {
            format!("  {:<20} {}", entry.user, counts.yellow())
        };
        println!("{}", line);
    }

    let done = progress
        .iter()
        .filter(|p| p.assigned > 0 && p.is_complete())
        .count();
    println!();
    println!("  {} of {} annotators complete", done, progress.len());
    Ok(())
}
