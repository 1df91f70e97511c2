use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a review came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    /// Human-written review shipped with the paper
    GroundTruth,
    /// Inference review from the primary review file
    ModelA,
    /// Inference review from the secondary review file
    ModelB,
}

impl ReviewSource {
    pub const ALL: [ReviewSource; 3] = [
        ReviewSource::GroundTruth,
        ReviewSource::ModelA,
        ReviewSource::ModelB,
    ];

    /// Stable key used in result files and the JSON API
    pub fn key(&self) -> &'static str {
        match self {
            ReviewSource::GroundTruth => "ground_truth",
            ReviewSource::ModelA => "model_a",
            ReviewSource::ModelB => "model_b",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReviewSource::GroundTruth => "Ground Truth",
            ReviewSource::ModelA => "Model A",
            ReviewSource::ModelB => "Model B",
        }
    }
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Named part of a review
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Strengths,
    Weaknesses,
    Questions,
}

impl Section {
    /// Sections in display order
    pub const ALL: [Section; 4] = [
        Section::Summary,
        Section::Strengths,
        Section::Weaknesses,
        Section::Questions,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Strengths => "strengths",
            Section::Weaknesses => "weaknesses",
            Section::Questions => "questions",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Strengths => "Strengths",
            Section::Weaknesses => "Weaknesses",
            Section::Questions => "Questions",
        }
    }

    /// Case-insensitive lookup by section name
    pub fn from_name(name: &str) -> Option<Section> {
        let name = name.trim();
        Section::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A review split into sections of individually rateable points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ParsedReview {
    pub sections: BTreeMap<Section, Vec<String>>,
}

impl Default for ParsedReview {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsedReview {
    /// Create a review with every section present and empty
    pub fn new() -> Self {
        Self {
            sections: Section::ALL.into_iter().map(|s| (s, Vec::new())).collect(),
        }
    }

    pub fn points(&self, section: Section) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, section: Section, point: impl Into<String>) {
        self.sections.entry(section).or_default().push(point.into());
    }

    /// Total number of points across all sections
    pub fn total_points(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_points() == 0
    }
}
