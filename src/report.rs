use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

use crate::markup::{markup_for, Format, Markup, STYLESHEET};
use crate::render::Fragment;

pub const DEFAULT_TITLE: &str = "Full Policy Diff Report";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    pub old_record_id: String,
    pub new_record_id: String,
    pub generated_at: NaiveDateTime,
    pub title: String,
}

impl ReportMetadata {
    pub fn rows(&self) -> [(&'static str, String); 3] {
        [
            ("Document A", self.old_record_id.clone()),
            ("Document B", self.new_record_id.clone()),
            (
                "Comparison Date",
                self.generated_at.format(TIMESTAMP_FORMAT).to_string(),
            ),
        ]
    }

    /// Title used for single-field exports.
    pub fn standalone_title(&self) -> String {
        format!(
            "Diff Report - {} vs {}",
            self.old_record_id, self.new_record_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub field: String,
    pub anchor: String,
    pub fragment: Fragment,
}

/// Rendered fields in the order they were selected, plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub metadata: ReportMetadata,
    sections: Vec<Section>,
}

impl Report {
    pub fn new(metadata: ReportMetadata) -> Report {
        Report {
            metadata,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, field: &str, fragment: Fragment) {
        self.sections.push(Section {
            field: field.to_string(),
            anchor: anchor_for(field),
            fragment,
        });
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.field.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Derives the table-of-contents anchor for a field.
///
/// The readable part drops spaces, periods and parentheses the way section
/// ids always have; the hash suffix keeps fields that slug alike apart.
pub fn anchor_for(field: &str) -> String {
    let slug: String = field
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect();
    let digest = hex::encode(Sha256::digest(field.as_bytes()));
    if slug.is_empty() {
        format!("field-{}", &digest[..8])
    } else {
        format!("{slug}-{}", &digest[..8])
    }
}

fn html_document(title: &str, body: &str) -> String {
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    doc.push_str(&format!("<title>{title}</title>\n"));
    doc.push_str(&format!("<style>{STYLESHEET}</style>\n"));
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&format!("<h1>{title}</h1>\n"));
    doc.push_str(body);
    doc.push_str("</body>\n</html>\n");
    doc
}

fn html_report(report: &Report, markup: &Markup) -> String {
    let meta = &report.metadata;
    let mut body = String::new();

    body.push_str(&format!(
        "<p class=\"generated\"><i>Generated on {}</i></p>\n",
        meta.generated_at.format(TIMESTAMP_FORMAT)
    ));
    body.push_str("<table class=\"metadata\"><tbody>\n");
    for (key, value) in meta.rows() {
        body.push_str(&format!(
            "<tr><td>{key}</td><td>{}</td></tr>\n",
            markup.escape(&value)
        ));
    }
    body.push_str("</tbody></table>\n");

    if report.is_empty() {
        body.push_str("<p class=\"no-changes\">No differences found.</p>\n");
        return html_document(&markup.escape(&meta.title), &body);
    }

    body.push_str("<nav class=\"toc\">\n<h2>Table of Contents</h2>\n<ul>\n");
    for section in report.sections() {
        body.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            section.anchor,
            markup.escape(&section.field)
        ));
    }
    body.push_str("</ul>\n</nav>\n");

    for section in report.sections() {
        body.push_str(&format!(
            "<section>\n<h2 id=\"{}\">{}</h2>\n<div class=\"diff-container\">{}</div>\n</section>\n",
            section.anchor,
            markup.escape(&section.field),
            markup.fragment(&section.fragment)
        ));
    }

    html_document(&markup.escape(&meta.title), &body)
}

fn text_report(report: &Report, markup: &Markup) -> String {
    let meta = &report.metadata;
    let mut out = String::new();

    out.push_str(&format!("{}\n", meta.title));
    out.push_str(&format!("{}\n", "=".repeat(meta.title.chars().count())));
    out.push_str(&format!(
        "Generated on {}\n\n",
        meta.generated_at.format(TIMESTAMP_FORMAT)
    ));
    for (key, value) in meta.rows() {
        out.push_str(&format!("{key}: {value}\n"));
    }

    if report.is_empty() {
        out.push_str("\nNo differences found.\n");
        return out;
    }

    out.push_str("\nContents\n");
    for (i, section) in report.sections().iter().enumerate() {
        out.push_str(&format!("  {}. {} (#{})\n", i + 1, section.field, section.anchor));
    }

    for section in report.sections() {
        out.push_str(&format!("\n## {} {{#{}}}\n\n", section.field, section.anchor));
        out.push_str(&markup.fragment(&section.fragment));
        out.push('\n');
    }
    out
}

/// Assembles the full multi-field document.
pub fn build_report(report: &Report, format: Format) -> String {
    let markup = markup_for(format);
    match format {
        Format::Html => html_report(report, &markup),
        Format::Text => text_report(report, &markup),
    }
}

/// Wraps a single fragment as a document of its own.
pub fn standalone_document(title: &str, fragment: &Fragment, format: Format) -> String {
    let markup = markup_for(format);
    match format {
        Format::Html => {
            let body = format!(
                "<div class=\"diff-container\">{}</div>\n",
                markup.fragment(fragment)
            );
            html_document(&markup.escape(title), &body)
        }
        Format::Text => format!(
            "{title}\n{}\n\n{}\n",
            "=".repeat(title.chars().count()),
            markup.fragment(fragment)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, ViewMode};
    use chrono::NaiveDate;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            old_record_id: "APP-001".into(),
            new_record_id: "APP-002".into(),
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 5)
                .and_then(|d| d.and_hms_opt(14, 7, 9))
                .unwrap(),
            title: DEFAULT_TITLE.into(),
        }
    }

    fn sample_report() -> Report {
        let mut report = Report::new(metadata());
        report.push(
            "Fee Schedule (Annex A)",
            render("The fee is $100.", "The fee is $150.", ViewMode::Inline),
        );
        report.push(
            "Scope",
            render("Clause one. Clause two.", "Clause one.", ViewMode::Inline),
        );
        report
    }

    #[test]
    fn anchors_keep_the_readable_slug() {
        let anchor = anchor_for("Fee Schedule (Annex A).");
        assert!(anchor.starts_with("Fee_Schedule_Annex_A-"), "{anchor}");
        assert_eq!(anchor.len(), "Fee_Schedule_Annex_A-".len() + 8);
    }

    #[test]
    fn anchors_are_deterministic() {
        assert_eq!(anchor_for("Scope"), anchor_for("Scope"));
    }

    #[test]
    fn fields_that_slug_alike_get_distinct_anchors() {
        assert_ne!(anchor_for("Section 1.2"), anchor_for("Section 12"));
        assert_ne!(anchor_for("Terms (a)"), anchor_for("Terms a"));
        assert!(anchor_for("()").starts_with("field-"));
    }

    #[test]
    fn html_report_lists_sections_in_order() {
        let html = build_report(&sample_report(), Format::Html);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Full Policy Diff Report</title>"));
        assert!(html.contains("Generated on 2024-03-05 14:07:09"));
        assert!(html.contains("<tr><td>Document A</td><td>APP-001</td></tr>"));
        assert!(html.contains("<tr><td>Document B</td><td>APP-002</td></tr>"));

        let fee_anchor = anchor_for("Fee Schedule (Annex A)");
        let scope_anchor = anchor_for("Scope");
        let toc_fee = html.find(&format!("href=\"#{fee_anchor}\"")).unwrap();
        let toc_scope = html.find(&format!("href=\"#{scope_anchor}\"")).unwrap();
        let sec_fee = html.find(&format!("id=\"{fee_anchor}\"")).unwrap();
        let sec_scope = html.find(&format!("id=\"{scope_anchor}\"")).unwrap();
        assert!(toc_fee < toc_scope);
        assert!(toc_scope < sec_fee);
        assert!(sec_fee < sec_scope);
        assert!(html.contains("<del class=\"word-removed\">$100.</del>"));
    }

    #[test]
    fn html_report_is_self_contained() {
        let html = build_report(&sample_report(), Format::Html);
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("src="));
    }

    #[test]
    fn metadata_is_escaped() {
        let mut meta = metadata();
        meta.old_record_id = "<A&B>".into();
        let html = build_report(&Report::new(meta), Format::Html);
        assert!(html.contains("<td>&lt;A&amp;B&gt;</td>"));
        assert!(html.contains("No differences found."));
    }

    #[test]
    fn text_report_has_contents_and_sections() {
        let text = build_report(&sample_report(), Format::Text);
        let expected_head = "Full Policy Diff Report\n\
                             =======================\n\
                             Generated on 2024-03-05 14:07:09\n\n\
                             Document A: APP-001\n\
                             Document B: APP-002\n\
                             Comparison Date: 2024-03-05 14:07:09\n\n\
                             Contents\n";
        assert!(text.starts_with(expected_head), "{text}");
        assert!(text.contains("~ The fee is [-$100.-] {+$150.+}"));
        assert!(text.contains("  Clause one.\n- Clause two."));
    }

    #[test]
    fn standalone_document_wraps_one_fragment() {
        let meta = metadata();
        let fragment = render("", "New clause added.", ViewMode::SideBySide);
        let html = standalone_document(&meta.standalone_title(), &fragment, Format::Html);
        assert!(html.contains("<title>Diff Report - APP-001 vs APP-002</title>"));
        assert!(html.contains("<div class=\"block filler\">&nbsp;</div>"));
        assert!(html.contains("<div class=\"block added\">New clause added.</div>"));
        assert!(!html.contains("Table of Contents"));

        let text = standalone_document("Scope", &fragment, Format::Text);
        assert_eq!(text, "Scope\n=====\n\n   | + New clause added.\n");
    }
}
