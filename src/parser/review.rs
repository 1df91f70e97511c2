use crate::models::{ParsedReview, Section};
use crate::Result;
use anyhow::Context;
use regex::Regex;
use std::path::Path;

/// Splits free-text reviews into Summary / Strengths / Weaknesses / Questions
///
/// A section marker is the section name at the start of a line, optionally
/// wrapped in Markdown heading hashes or emphasis and optionally qualified
/// (`Questions for the authors:`, `Summary of the paper:`). It is recognised
/// either alone on its line (`## Strengths`, `**Weaknesses:**`) or followed
/// by a colon and text (`Summary: The paper ...`). Markers followed by text
/// must be capitalised so prose such as "questions: ..." is not mistaken for
/// a heading. A section name in the middle of a line never opens a section.
pub struct ReviewParser {
    marker_re: Regex,
    bullet_re: Regex,
}

impl ReviewParser {
    pub fn new() -> Result<Self> {
        let qualifier = r"(?i:[ \t]+(?:for|of)[ \t]+[^:\n]{0,40}?)";
        let line_marker = format!(
            r"(?i:^[ \t]*(?:#{{1,6}}[ \t]*)?[*_]{{0,2}}[ \t]*(summary|strengths|weaknesses|questions)(?:{q}[ \t]*[*_]{{0,2}}[ \t]*:|[ \t]*[*_]{{0,2}}[ \t]*:?)[ \t]*[*_]{{0,2}}[ \t]*$)",
            q = qualifier
        );
        let inline_marker = format!(
            r"^[ \t]*(?:-[ \t]+[*_]{{0,2}}[ \t]*({n})|(?:#{{1,6}}[ \t]*)?[*_]{{0,2}}[ \t]*({n})(?:{q})?)[ \t]*[*_]{{0,2}}[ \t]*:[ \t]*[*_]{{0,2}}",
            n = "Summary|Strengths|Weaknesses|Questions|SUMMARY|STRENGTHS|WEAKNESSES|QUESTIONS",
            q = qualifier
        );
        let marker_re = Regex::new(&format!("(?m){}|{}", line_marker, inline_marker))
            .context("Failed to compile section marker regex")?;
        let bullet_re =
            Regex::new(r"(?m)^[ \t]*-[ \t]+").context("Failed to compile bullet regex")?;

        Ok(Self {
            marker_re,
            bullet_re,
        })
    }

    /// Parse review text into sections
    ///
    /// Text before the first marker is ignored. Sections without a marker
    /// stay empty; a section marked twice accumulates points.
    pub fn parse(&self, text: &str) -> ParsedReview {
        let text = text.replace("\r\n", "\n");
        let mut review = ParsedReview::new();

        let markers: Vec<(Section, usize, usize)> = self
            .marker_re
            .captures_iter(&text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.iter().skip(1).flatten().next()?;
                let section = Section::from_name(name.as_str())?;
                Some((section, whole.start(), whole.end()))
            })
            .collect();

        for (i, (section, _, body_start)) in markers.iter().enumerate() {
            let body_end = markers
                .get(i + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(text.len());
            let body = &text[*body_start..body_end];

            match section {
                Section::Summary => {
                    let summary = collapse_whitespace(body);
                    if has_content(&summary) {
                        review.push(Section::Summary, summary);
                    }
                }
                _ => {
                    for point in self.split_points(body) {
                        review.push(*section, point);
                    }
                }
            }
        }

        review
    }

    /// Split a section body on leading hyphen bullets
    fn split_points(&self, body: &str) -> Vec<String> {
        self.bullet_re
            .split(body)
            .map(collapse_whitespace)
            .filter(|p| has_content(p))
            .collect()
    }
}

/// Parse a review with a freshly compiled parser
pub fn parse_review(text: &str) -> Result<ParsedReview> {
    Ok(ReviewParser::new()?.parse(text))
}

/// Parse a review stored in a text file
pub fn parse_review_file(path: &Path) -> Result<ParsedReview> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read review file: {}", path.display()))?;
    parse_review(&content)
}

/// Join wrapped lines into single-spaced text
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rules such as `---` or stray emphasis markers are not points
fn has_content(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedReview {
        ReviewParser::new().unwrap().parse(text)
    }

    #[test]
    fn test_parse_bold_markers() {
        let review = parse(
            "**Summary:** The paper proposes a graph model.\n\n\
             **Strengths:**\n- Novel idea\n- Good results\n\n\
             **Weaknesses:**\n- Limited baselines\n\n\
             **Questions:**\n- How does it scale?\n",
        );

        assert_eq!(
            review.points(Section::Summary),
            ["The paper proposes a graph model."]
        );
        assert_eq!(review.points(Section::Strengths), ["Novel idea", "Good results"]);
        assert_eq!(review.points(Section::Weaknesses), ["Limited baselines"]);
        assert_eq!(review.points(Section::Questions), ["How does it scale?"]);
    }

    #[test]
    fn test_parse_heading_markers() {
        let review = parse(
            "## Summary\nA short summary\nspanning two lines.\n\n\
             ## Strengths\n  - Indented bullet\n- Second\n\n\
             ### Weaknesses:\n- Only one\n",
        );

        assert_eq!(
            review.points(Section::Summary),
            ["A short summary spanning two lines."]
        );
        assert_eq!(review.points(Section::Strengths), ["Indented bullet", "Second"]);
        assert_eq!(review.points(Section::Weaknesses), ["Only one"]);
        assert!(review.points(Section::Questions).is_empty());
    }

    #[test]
    fn test_markers_are_case_insensitive_on_their_own_line() {
        let review = parse("STRENGTHS\n- a\nweaknesses:\n- b\n");
        assert_eq!(review.points(Section::Strengths), ["a"]);
        assert_eq!(review.points(Section::Weaknesses), ["b"]);
    }

    #[test]
    fn test_inline_lowercase_word_is_not_a_marker() {
        let review = parse("Weaknesses:\n- There are open questions: which data?\n");
        assert_eq!(
            review.points(Section::Weaknesses),
            ["There are open questions: which data?"]
        );
        assert!(review.points(Section::Questions).is_empty());
    }

    #[test]
    fn test_capitalised_name_inside_bullet_is_not_a_marker() {
        let review = parse("Weaknesses:\n- The paper lacks a Summary: of results\n- other\n");
        assert_eq!(
            review.points(Section::Weaknesses),
            ["The paper lacks a Summary: of results", "other"]
        );
        assert!(review.points(Section::Summary).is_empty());
    }

    #[test]
    fn test_qualified_headers() {
        let review = parse(
            "Summary Of The Paper:\nA paper.\n\
             Strengths:\n- strong\n\
             Weaknesses:\n- weak\n\
             Questions for the authors:\n- why?\n",
        );
        assert_eq!(review.points(Section::Summary), ["A paper."]);
        assert_eq!(review.points(Section::Strengths), ["strong"]);
        assert_eq!(review.points(Section::Weaknesses), ["weak"]);
        assert_eq!(review.points(Section::Questions), ["why?"]);
    }

    #[test]
    fn test_qualified_inline_and_emphasised_headers() {
        let review = parse(
            "Summary of the paper: A graph model.\n\
             **Questions for the authors:**\n- How large?\n",
        );
        assert_eq!(review.points(Section::Summary), ["A graph model."]);
        assert_eq!(review.points(Section::Questions), ["How large?"]);
    }

    #[test]
    fn test_bullet_marker_requires_plain_name() {
        let review = parse(
            "Weaknesses:\n- Strengths of the method are overstated: see Table 2\n\
             - Questions: Why this prior?\n",
        );
        assert_eq!(
            review.points(Section::Weaknesses),
            ["Strengths of the method are overstated: see Table 2"]
        );
        assert!(review.points(Section::Strengths).is_empty());
        assert_eq!(review.points(Section::Questions), ["Why this prior?"]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let review = parse("Strengths:\n- Only strengths here\n");
        assert!(review.points(Section::Summary).is_empty());
        assert!(review.points(Section::Weaknesses).is_empty());
        assert!(review.points(Section::Questions).is_empty());
        assert_eq!(review.total_points(), 1);
    }

    #[test]
    fn test_missing_summary_yields_no_point() {
        let review = parse("Summary:\n\nStrengths:\n- x\n");
        assert!(review.points(Section::Summary).is_empty());
        assert_eq!(review.points(Section::Strengths), ["x"]);
    }

    #[test]
    fn test_no_markers_yields_empty_review() {
        assert!(parse("Not Available").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_text_before_first_marker_is_ignored() {
        let review = parse("Review #2 by an anonymous referee\n\nStrengths:\n- good\n");
        assert_eq!(review.total_points(), 1);
    }

    #[test]
    fn test_body_without_bullets_is_one_point() {
        let review = parse("Questions: Could the authors release code?\n");
        assert_eq!(
            review.points(Section::Questions),
            ["Could the authors release code?"]
        );
    }

    #[test]
    fn test_intro_text_is_a_point() {
        let review = parse("Weaknesses:\nSeveral issues.\n- Real issue\n");
        assert_eq!(
            review.points(Section::Weaknesses),
            ["Several issues.", "Real issue"]
        );
    }

    #[test]
    fn test_empty_bullets_and_rules_are_discarded() {
        let review = parse("Weaknesses:\n---\n- \n- Real issue\n");
        assert_eq!(review.points(Section::Weaknesses), ["Real issue"]);
    }

    #[test]
    fn test_bullet_on_marker_line() {
        let review = parse("**Strengths:** - First\n- Second\n");
        assert_eq!(review.points(Section::Strengths), ["First", "Second"]);
    }

    #[test]
    fn test_hyphenated_words_are_not_split() {
        let review = parse("Strengths:\n- State-of-the-art results - on three datasets\n");
        assert_eq!(
            review.points(Section::Strengths),
            ["State-of-the-art results - on three datasets"]
        );
    }

    #[test]
    fn test_repeated_section_accumulates() {
        let review = parse("Strengths:\n- a\nWeaknesses:\n- b\nStrengths:\n- c\n");
        assert_eq!(review.points(Section::Strengths), ["a", "c"]);
    }

    #[test]
    fn test_crlf_input() {
        let review = parse("Strengths:\r\n- a\r\n- b\r\n");
        assert_eq!(review.points(Section::Strengths), ["a", "b"]);
    }

    #[test]
    fn test_parse_review_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("review.txt");
        std::fs::write(&path, "Summary: s\nQuestions:\n- q\n").unwrap();

        let review = parse_review_file(&path).unwrap();
        assert_eq!(review.total_points(), 2);
        assert!(parse_review_file(&temp_dir.path().join("missing.txt")).is_err());
    }
}
