//! Parse a review file and print its sections

use crate::models::{ParsedReview, Section};
use crate::parser::parse_review_file;
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let review = parse_review_file(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&review)?);
        return Ok(());
    }

    print!("{}", format_review(&review));
    println!(
        "{}",
        format!("{} points in total", review.total_points()).bright_black()
    );
    Ok(())
}

fn format_review(review: &ParsedReview) -> String {
    let mut out = String::new();
    for section in Section::ALL {
        let points = review.points(section);
        out.push_str(&format!(
            "{} ({})\n",
            section.name().cyan().bold(),
            points.len()
        ));
        if points.is_empty() {
            out.push_str(&format!("  {}\n", "(none)".bright_black()));
        }
        for (idx, point) in points.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", idx + 1, point));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_review_lists_every_section() {
        colored::control::set_override(false);
        let mut review = ParsedReview::new();
        review.push(Section::Weaknesses, "Small dataset");

        let out = format_review(&review);
        assert!(out.contains("Summary (0)"));
        assert!(out.contains("Weaknesses (1)"));
        assert!(out.contains("  1. Small dataset"));
        assert_eq!(out.matches("(none)").count(), 3);
    }
}
