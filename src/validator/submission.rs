use crate::form::FormLayout;
use crate::models::{Rating, ScoredPoint, Section};
use std::collections::HashMap;

/// A single problem with a submitted rating form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionIssue {
    /// The point was left at the unset default
    Missing {
        slot: usize,
        section: Section,
        index: usize,
        field: String,
    },
    /// The submitted value is not on the rating scale
    Invalid {
        slot: usize,
        section: Section,
        index: usize,
        field: String,
        value: String,
    },
    /// None of the three reviews produced a rateable point
    NothingToRate,
}

impl SubmissionIssue {
    /// Field name of the offending control, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SubmissionIssue::Missing { field, .. } | SubmissionIssue::Invalid { field, .. } => {
                Some(field.as_str())
            }
            SubmissionIssue::NothingToRate => None,
        }
    }
}

impl std::fmt::Display for SubmissionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionIssue::Missing {
                slot,
                section,
                index,
                ..
            } => write!(f, "Review {} / {} point {} is not rated", slot, section, index),
            SubmissionIssue::Invalid {
                slot,
                section,
                index,
                value,
                ..
            } => write!(
                f,
                "Review {} / {} point {} has an invalid rating '{}'",
                slot, section, index, value
            ),
            SubmissionIssue::NothingToRate => {
                write!(f, "This paper has no review points to rate")
            }
        }
    }
}

/// Rejected submission with every issue found
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Submission rejected: {} issue(s)", .issues.len())]
pub struct SubmissionErrors {
    pub issues: Vec<SubmissionIssue>,
}

impl SubmissionErrors {
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }

    pub fn fields(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter_map(|i| i.field().map(str::to_string))
            .collect()
    }
}

/// Check that every rendered point carries a rating on the scale
///
/// Fields that do not belong to a rendered point are ignored. On success the
/// rated points come back in page order, tagged with their review source.
pub fn validate_submission(
    layout: &FormLayout,
    fields: &HashMap<String, String>,
) -> Result<Vec<ScoredPoint>, SubmissionErrors> {
    let points = layout.points();
    if points.is_empty() {
        return Err(SubmissionErrors {
            issues: vec![SubmissionIssue::NothingToRate],
        });
    }

    let mut issues = Vec::new();
    let mut scored = Vec::with_capacity(points.len());

    for point in points {
        let field = point.field_name();
        let raw = fields.get(&field).map(String::as_str).unwrap_or("");

        match Rating::from_field(raw) {
            Some(rating) if rating.is_set() => scored.push(ScoredPoint {
                source: point.source,
                section: point.section,
                index: point.index,
                text: point.text.to_string(),
                rating,
            }),
            Some(_) => issues.push(SubmissionIssue::Missing {
                slot: point.slot,
                section: point.section,
                index: point.index,
                field,
            }),
            None => issues.push(SubmissionIssue::Invalid {
                slot: point.slot,
                section: point.section,
                index: point.index,
                field,
                value: raw.to_string(),
            }),
        }
    }

    if issues.is_empty() {
        Ok(scored)
    } else {
        Err(SubmissionErrors { issues })
    }
}
