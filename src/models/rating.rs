use super::{ReviewSource, Section};
use serde::{Deserialize, Serialize};

/// Agreement with a single review point
///
/// `Unset` is the default a form control starts with. A submission is only
/// accepted once every point carries one of the four scale values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    #[default]
    Unset,
    StronglyDisagree,
    Disagree,
    Agree,
    StronglyAgree,
}

impl Rating {
    /// The rateable values, lowest agreement first
    pub const SCALE: [Rating; 4] = [
        Rating::StronglyDisagree,
        Rating::Disagree,
        Rating::Agree,
        Rating::StronglyAgree,
    ];

    /// Numeric score (1..=4), `None` when unset
    pub fn value(&self) -> Option<u8> {
        match self {
            Rating::Unset => None,
            Rating::StronglyDisagree => Some(1),
            Rating::Disagree => Some(2),
            Rating::Agree => Some(3),
            Rating::StronglyAgree => Some(4),
        }
    }

    pub fn from_value(value: u8) -> Option<Rating> {
        Rating::SCALE.into_iter().find(|r| r.value() == Some(value))
    }

    /// Parse a submitted form value
    ///
    /// An empty value or `0` is the unset sentinel. Anything else must be a
    /// score on the scale.
    pub fn from_field(raw: &str) -> Option<Rating> {
        match raw.trim() {
            "" | "0" => Some(Rating::Unset),
            other => other.parse::<u8>().ok().and_then(Rating::from_value),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Rating::Unset)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Unset => "-- Select --",
            Rating::StronglyDisagree => "Strongly Disagree",
            Rating::Disagree => "Disagree",
            Rating::Agree => "Agree",
            Rating::StronglyAgree => "Strongly Agree",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A rated point accepted by the submission validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPoint {
    pub source: ReviewSource,
    pub section: Section,
    /// 1-based position within the section
    pub index: usize,
    pub text: String,
    pub rating: Rating,
}

/// One row of the results file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingRecord {
    pub submission_id: String,
    pub timestamp: String,
    pub user: String,
    pub paper_id: String,
    pub review_source: ReviewSource,
    pub section: Section,
    pub point_index: usize,
    pub point: String,
    pub rating: u8,
    pub rating_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert_eq!(Rating::default(), Rating::Unset);
        assert!(!Rating::default().is_set());
        assert_eq!(Rating::Unset.value(), None);
    }

    #[test]
    fn test_scale_values() {
        let values: Vec<u8> = Rating::SCALE.iter().filter_map(|r| r.value()).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
        assert_eq!(Rating::from_value(3), Some(Rating::Agree));
        assert_eq!(Rating::from_value(5), None);
    }

    #[test]
    fn test_from_field() {
        assert_eq!(Rating::from_field(""), Some(Rating::Unset));
        assert_eq!(Rating::from_field("0"), Some(Rating::Unset));
        assert_eq!(Rating::from_field(" 4 "), Some(Rating::StronglyAgree));
        assert_eq!(Rating::from_field("7"), None);
        assert_eq!(Rating::from_field("agree"), None);
    }
}
