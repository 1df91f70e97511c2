//! Start the annotation server

use crate::dataset::Dataset;
use crate::models::EvalConfig;
use crate::parser::ReviewParser;
use crate::server::{build_router, AppState};
use crate::Result;
use colored::Colorize;

pub async fn run(config: &EvalConfig, open_browser: bool) -> Result<()> {
    let dataset = Dataset::load(config)?;
    println!(
        "{}",
        format!(
            "✓ Loaded {} annotators and {} papers from {}",
            dataset.users().len(),
            dataset.all_papers().len(),
            config.data_dir.display()
        )
        .green()
    );

    let state = AppState::new(config, dataset, ReviewParser::new()?);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let url = format!("http://{}", addr);

    tracing::info!(%addr, results = %config.results_path.display(), "Annotation server listening");
    println!("{}", format!("✓ Server listening on {}", url).cyan());
    println!("  Results: {}", config.results_path.display());

    if open_browser {
        open_in_browser(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "ui")]
fn open_in_browser(url: &str) {
    if let Err(e) = open::that(url) {
        println!(
            "{}",
            format!("⚠ Failed to open browser: {}. Open {} manually.", e, url).yellow()
        );
    }
}

#[cfg(not(feature = "ui"))]
fn open_in_browser(url: &str) {
    println!(
        "{}",
        format!(
            "⚠ Browser launch requires the 'ui' feature. Open {} manually.",
            url
        )
        .yellow()
    );
}
