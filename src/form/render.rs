//! Server-side HTML for the annotation pages

use super::layout::{field_name, FormLayout};
use super::markdown::{html_escape, render_review_markdown};
use crate::models::{Rating, Section};
use std::collections::HashMap;

const STYLES: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; color: #1f2328; }
header { padding: 12px 24px; border-bottom: 1px solid #d0d7de; background: #f6f8fa; }
header a { color: inherit; text-decoration: none; }
main { padding: 16px 24px; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
.pdf iframe { width: 100%; height: 85vh; border: 1px solid #d0d7de; }
.review { border: 1px solid #d0d7de; border-radius: 6px; padding: 12px 16px; margin-bottom: 16px; }
.point { display: flex; justify-content: space-between; gap: 12px; padding: 6px 0; border-bottom: 1px dashed #eaeef2; }
.point select { min-width: 170px; }
.point.missing { background: #fff1f0; }
.notice { padding: 10px 14px; border-radius: 6px; margin-bottom: 16px; }
.notice.info { background: #ddf4ff; }
.notice.warn { background: #fff8c5; }
.notice.error { background: #ffebe9; }
.empty { color: #57606a; font-style: italic; }
ul.papers li { margin: 6px 0; }
.rated { color: #1a7f37; font-weight: 600; }
button { padding: 8px 20px; font-size: 15px; }
"#;

/// Everything the form page needs beyond the layout itself
#[derive(Debug, Default)]
pub struct FormView<'a> {
    /// Previously submitted values, keyed by field name
    pub values: Option<&'a HashMap<String, String>>,
    /// Validation messages shown above the form
    pub errors: &'a [String],
    /// Field names to highlight
    pub flagged: &'a [String],
    pub already_rated: bool,
    pub pdf_available: bool,
}

/// Wrap page content with the shared header and styles
fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{styles}</style>
</head>
<body>
<header><a href="/"><strong>Human Evaluation Interface</strong></a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = html_escape(title),
        styles = STYLES,
        body = body,
    )
}

/// Percent-encode a path segment
pub fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub fn render_user_selection(users: &[String]) -> String {
    let mut body = String::from("<h1>Annotator Selection</h1>\n");

    if users.is_empty() {
        body.push_str(r#"<p class="empty">The user roster is empty.</p>"#);
        return page("Annotator Selection", &body);
    }

    body.push_str("<p>Please select your username to begin.</p>\n<ul class=\"papers\">\n");
    for user in users {
        body.push_str(&format!(
            "<li><a href=\"/annotate/{}\">{}</a></li>\n",
            encode_segment(user),
            html_escape(user)
        ));
    }
    body.push_str("</ul>\n");

    page("Annotator Selection", &body)
}

/// Paper list for a user; each entry carries its rated flag
pub fn render_paper_selection(user: &str, papers: &[(String, bool)]) -> String {
    let mut body = format!("<h1>Paper Selection</h1>\n<p>Annotator: <code>{}</code></p>\n", html_escape(user));

    if papers.is_empty() {
        body.push_str(r#"<div class="notice warn">No papers assigned to this user.</div>"#);
        return page("Paper Selection", &body);
    }

    body.push_str("<ul class=\"papers\">\n");
    for (paper_id, rated) in papers {
        body.push_str(&format!(
            "<li><a href=\"/annotate/{}/{}\">{}</a>{}</li>\n",
            encode_segment(user),
            encode_segment(paper_id),
            html_escape(paper_id),
            if *rated {
                r#" <span class="rated">&#10003; rated</span>"#
            } else {
                ""
            }
        ));
    }
    body.push_str("</ul>\n");

    page("Paper Selection", &body)
}

fn rating_select(name: &str, selected: Rating) -> String {
    let mut select = format!("<select name=\"{}\">", html_escape(name));
    let options = std::iter::once(Rating::Unset).chain(Rating::SCALE);
    for rating in options {
        select.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            rating.value().unwrap_or(0),
            if rating == selected { " selected" } else { "" },
            rating.label()
        ));
    }
    select.push_str("</select>");
    select
}

pub fn render_form_page(layout: &FormLayout, view: &FormView<'_>) -> String {
    let user = encode_segment(&layout.user);
    let paper = encode_segment(&layout.paper_id);
    let mut body = format!(
        "<h1>Reviewing Paper: <code>{}</code></h1>\n",
        html_escape(&layout.paper_id)
    );

    if view.already_rated {
        body.push_str(
            r#"<div class="notice info">You have already rated this paper. Your earlier ratings are kept; resubmitting will not record a second set.</div>"#,
        );
    }

    if !view.errors.is_empty() {
        body.push_str("<div class=\"notice error\"><strong>Please fix the following before submitting:</strong><ul>");
        for error in view.errors {
            body.push_str(&format!("<li>{}</li>", html_escape(error)));
        }
        body.push_str("</ul></div>\n");
    }

    body.push_str("<div class=\"columns\">\n<section class=\"pdf\">\n<h2>Original Paper</h2>\n");
    if view.pdf_available {
        body.push_str(&format!(
            "<iframe src=\"/pdf/{}\" title=\"Paper PDF\"></iframe>\n",
            paper
        ));
    } else {
        body.push_str(&format!(
            "<div class=\"notice error\">PDF not found for paper {}</div>\n",
            html_escape(&layout.paper_id)
        ));
    }
    body.push_str("</section>\n");

    body.push_str(&format!(
        "<section>\n<h2>Reviews</h2>\n<form method=\"post\" action=\"/annotate/{}/{}\">\n",
        user, paper
    ));

    for slot in &layout.slots {
        body.push_str(&format!(
            "<div class=\"review\">\n<h3>Review {}</h3>\n",
            slot.number
        ));

        for section in Section::ALL {
            body.push_str(&format!("<h4>{}</h4>\n", section.name()));
            let points = slot.review.points(section);
            if points.is_empty() {
                body.push_str("<p class=\"empty\">No points in this section.</p>\n");
                continue;
            }

            for (idx, point) in points.iter().enumerate() {
                let name = field_name(slot.number, section, idx + 1);
                let selected = view
                    .values
                    .and_then(|values| values.get(&name))
                    .and_then(|raw| Rating::from_field(raw))
                    .unwrap_or_default();
                let class = if view.flagged.contains(&name) {
                    "point missing"
                } else {
                    "point"
                };
                body.push_str(&format!(
                    "<div class=\"{}\"><span>{}</span>{}</div>\n",
                    class,
                    html_escape(point),
                    rating_select(&name, selected)
                ));
            }
        }

        body.push_str(&format!(
            "<details><summary>Full text of Review {}</summary>\n{}</details>\n</div>\n",
            slot.number,
            render_review_markdown(&slot.raw)
        ));
    }

    body.push_str("<button type=\"submit\">Submit Ratings</button>\n</form>\n</section>\n</div>\n");

    page(&format!("Paper {}", layout.paper_id), &body)
}

pub fn render_confirmation(user: &str, paper_id: &str, records: Option<usize>) -> String {
    let message = match records {
        Some(count) => format!(
            "<div class=\"notice info\">Saved {} ratings for paper <code>{}</code>. Thank you!</div>",
            count,
            html_escape(paper_id)
        ),
        None => format!(
            "<div class=\"notice warn\">Paper <code>{}</code> was already rated; no new ratings were recorded.</div>",
            html_escape(paper_id)
        ),
    };

    let body = format!(
        "<h1>Submission</h1>\n{}\n<p><a href=\"/annotate/{}\">Back to your papers</a></p>\n",
        message,
        encode_segment(user)
    );
    page("Submission", &body)
}

pub fn render_error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<div class=\"notice error\">{}</div>\n<p><a href=\"/\">Back to annotator selection</a></p>\n",
        html_escape(title),
        html_escape(message)
    );
    page(title, &body)
}
