//! Print stored ratings

use crate::models::EvalConfig;
use crate::store::ResultsStore;
use crate::Result;
use colored::Colorize;
use std::io;

pub fn run(config: &EvalConfig, json: bool) -> Result<()> {
    let store = ResultsStore::new(config.results_path.clone());
    let records = store.records()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!(
            "{}",
            format!("No ratings stored in {}", store.path().display()).yellow()
        );
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
