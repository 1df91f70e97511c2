use crate::dataset::Dataset;
use crate::models::{ParsedReview, ReviewSource, Section};
use crate::parser::ReviewParser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// One of the three blind review columns on the form
#[derive(Debug, Clone)]
pub struct ReviewSlot {
    /// 1-based position shown as "Review N"
    pub number: usize,
    pub source: ReviewSource,
    pub raw: String,
    pub review: ParsedReview,
}

/// A rateable point as it appears on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedPoint<'a> {
    pub slot: usize,
    pub source: ReviewSource,
    pub section: Section,
    /// 1-based position within the section
    pub index: usize,
    pub text: &'a str,
}

impl RenderedPoint<'_> {
    pub fn field_name(&self) -> String {
        field_name(self.slot, self.section, self.index)
    }
}

/// Name of the rating control for a point
///
/// Built from the slot number so the review source stays hidden from the
/// annotator.
pub fn field_name(slot: usize, section: Section, index: usize) -> String {
    format!("rating-{}-{}-{}", slot, section.key(), index)
}

/// The three reviews of a paper, parsed and shuffled for one annotator
#[derive(Debug, Clone)]
pub struct FormLayout {
    pub user: String,
    pub paper_id: String,
    pub slots: Vec<ReviewSlot>,
}

impl FormLayout {
    /// Parse the paper's reviews and order them for this user
    pub fn build(
        user: &str,
        paper_id: &str,
        dataset: &Dataset,
        parser: &ReviewParser,
        salt: &str,
    ) -> Self {
        let order = review_order(salt, user, paper_id);
        let reviews = dataset.reviews_for(paper_id);

        let slots = order
            .into_iter()
            .enumerate()
            .map(|(idx, source)| {
                let raw = reviews
                    .iter()
                    .find(|(s, _)| *s == source)
                    .map(|(_, text)| text.clone())
                    .unwrap_or_default();
                ReviewSlot {
                    number: idx + 1,
                    source,
                    review: parser.parse(&raw),
                    raw,
                }
            })
            .collect();

        Self {
            user: user.to_string(),
            paper_id: paper_id.to_string(),
            slots,
        }
    }

    /// Every point that gets a rating control, in page order
    pub fn points(&self) -> Vec<RenderedPoint<'_>> {
        let mut points = Vec::new();
        for slot in &self.slots {
            for section in Section::ALL {
                for (idx, text) in slot.review.points(section).iter().enumerate() {
                    points.push(RenderedPoint {
                        slot: slot.number,
                        source: slot.source,
                        section,
                        index: idx + 1,
                        text,
                    });
                }
            }
        }
        points
    }

    pub fn total_points(&self) -> usize {
        self.slots.iter().map(|s| s.review.total_points()).sum()
    }
}

/// Deterministic shuffle of the review sources
///
/// Seeded from `sha256(salt | user | paper)` so reloading a page keeps the
/// order while different users and papers see different orders.
pub fn review_order(salt: &str, user: &str, paper_id: &str) -> [ReviewSource; 3] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"|");
    hasher.update(user.as_bytes());
    hasher.update(b"|");
    hasher.update(paper_id.as_bytes());
    let digest = hasher.finalize();

    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed_bytes));

    let mut order = ReviewSource::ALL;
    order.shuffle(&mut rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ReviewEntry;
    use std::collections::{BTreeMap, HashSet};

    fn dataset() -> Dataset {
        let mut primary = BTreeMap::new();
        primary.insert(
            "p1".to_string(),
            ReviewEntry {
                gold_review: Some("Summary: gold\nStrengths:\n- g1\n- g2".to_string()),
                inference_review: Some("Weaknesses:\n- a1".to_string()),
            },
        );
        let mut secondary = BTreeMap::new();
        secondary.insert(
            "p1".to_string(),
            ReviewEntry {
                gold_review: None,
                inference_review: Some("Questions:\n- b1".to_string()),
            },
        );

        Dataset::from_parts(
            vec!["alice".to_string()],
            vec![("alice".to_string(), vec!["p1".to_string()])],
            primary,
            secondary,
            "pdfs",
            "master",
        )
    }

    #[test]
    fn test_review_order_is_stable() {
        let first = review_order("salt", "alice", "p1");
        let second = review_order("salt", "alice", "p1");
        assert_eq!(first, second);
    }

    #[test]
    fn test_review_order_is_a_permutation() {
        let order = review_order("salt", "bob", "p7");
        let unique: HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_review_order_varies_across_papers() {
        let orders: HashSet<_> = (0..30)
            .map(|i| review_order("salt", "alice", &format!("paper-{}", i)))
            .collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_build_layout() {
        let parser = ReviewParser::new().unwrap();
        let layout = FormLayout::build("alice", "p1", &dataset(), &parser, "salt");

        assert_eq!(layout.slots.len(), 3);
        assert_eq!(
            layout.slots.iter().map(|s| s.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(layout.total_points(), 5);

        let gold = layout
            .slots
            .iter()
            .find(|s| s.source == ReviewSource::GroundTruth)
            .unwrap();
        assert_eq!(gold.review.points(Section::Strengths), ["g1", "g2"]);
    }

    #[test]
    fn test_points_and_field_names() {
        let parser = ReviewParser::new().unwrap();
        let layout = FormLayout::build("alice", "p1", &dataset(), &parser, "salt");
        let points = layout.points();

        assert_eq!(points.len(), 5);
        let names: HashSet<String> = points.iter().map(|p| p.field_name()).collect();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all(|n| n.starts_with("rating-")));
        assert!(names.iter().all(|n| !n.contains("ground") && !n.contains("model")));
    }

    #[test]
    fn test_field_name_format() {
        assert_eq!(field_name(2, Section::Weaknesses, 3), "rating-2-weaknesses-3");
    }
}
