use clap::ValueEnum;

use crate::highlight::{Span, SpanKind};
use crate::render::{Block, BlockKind, Fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Format {
    /// Self-contained HTML document
    #[default]
    Html,
    /// Plain text with [-removed-] and {+added+} markers
    Text,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Text => "txt",
        }
    }
}

/// Stylesheet embedded in every HTML document.
///
/// Added text is blue and underlined, removed text orange-red and struck
/// through, and changed sentences get an amber outline, so the three edit
/// classes remain distinguishable without color.
pub const STYLESHEET: &str = r#"
html { scroll-behavior: smooth; }
body { background-color: #1e1e1e; color: #f5f5f5; font-family: monospace; padding: 20px; line-height: 1.5; }
h1 { font-size: 1.6em; color: #61dafb; }
h2 { font-size: 1.2em; color: #61dafb; border-bottom: 1px solid #444; padding-bottom: 4px; margin-top: 30px; }
a { color: #61dafb; text-decoration: none; }
a:hover { text-decoration: underline; }
table.metadata { border-collapse: collapse; width: 100%; margin-bottom: 20px; background-color: #2b2b2b; border: 1px solid #555; }
table.metadata td { padding: 6px 10px; border-bottom: 1px solid #444; }
table.metadata td:first-child { width: 220px; color: #61dafb; font-weight: bold; }
nav.toc { background-color: #2b2b2b; padding: 10px 15px; border-radius: 6px; margin-bottom: 20px; }
nav.toc h2 { margin-top: 0; border-bottom: none; }
nav.toc ul { list-style-type: none; margin: 0; padding-left: 10px; }
nav.toc li { margin: 5px 0; }
.diff-container { border-radius: 10px; padding: 10px; margin-top: 10px; }
.diff.side-by-side { display: grid; grid-template-columns: 1fr 1fr; column-gap: 10px; }
.block { padding: 6px; border-radius: 6px; margin: 2px 0; white-space: pre-wrap; }
.block.added { background-color: #1565c030; color: #64b5f6; text-decoration: underline; }
.block.removed { background-color: #e6510030; color: #ff8a65; text-decoration: line-through; }
.block.changed { outline: 1px solid #ffb300; background-color: #ffb30014; }
.block.filler { background-color: #2b2b2b; }
ins.word-added { background-color: #1565c0; color: #ffffff; text-decoration: underline; }
del.word-removed { background-color: #bf360c; color: #ffffff; text-decoration: line-through; }
.no-changes { font-style: italic; }
"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// How spans, blocks and fragments are written for one output format.
#[derive(Debug)]
pub enum Markup {
    Html,
    Text {
        removed: (&'static str, &'static str),
        added: (&'static str, &'static str),
    },
}

pub fn markup_for(format: Format) -> Markup {
    match format {
        Format::Html => Markup::Html,
        Format::Text => Markup::Text {
            removed: ("[-", "-]"),
            added: ("{+", "+}"),
        },
    }
}

impl Markup {
    /// Escapes caller-supplied text for this format.
    pub fn escape(&self, text: &str) -> String {
        match self {
            Markup::Html => escape_html(text),
            Markup::Text { .. } => text.to_string(),
        }
    }

    pub fn span(&self, span: &Span) -> String {
        match self {
            Markup::Html => {
                let text = escape_html(&span.text);
                match span.kind {
                    SpanKind::Plain => text,
                    SpanKind::Removed => format!("<del class=\"word-removed\">{text}</del>"),
                    SpanKind::Added => format!("<ins class=\"word-added\">{text}</ins>"),
                }
            }
            Markup::Text { removed, added } => match span.kind {
                SpanKind::Plain => span.text.clone(),
                SpanKind::Removed => format!("{}{}{}", removed.0, span.text, removed.1),
                SpanKind::Added => format!("{}{}{}", added.0, span.text, added.1),
            },
        }
    }

    pub fn spans(&self, spans: &[Span]) -> String {
        spans
            .iter()
            .map(|span| self.span(span))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn block(&self, block: &Block) -> String {
        let body = self.spans(&block.spans);
        match self {
            Markup::Html => {
                let class = match block.kind {
                    BlockKind::Unchanged => "block",
                    BlockKind::Changed => "block changed",
                    BlockKind::Removed => "block removed",
                    BlockKind::Added => "block added",
                    BlockKind::Filler => return "<div class=\"block filler\">&nbsp;</div>".into(),
                };
                format!("<div class=\"{class}\">{body}</div>")
            }
            Markup::Text { .. } => {
                let prefix = match block.kind {
                    BlockKind::Unchanged | BlockKind::Filler => "  ",
                    BlockKind::Changed => "~ ",
                    BlockKind::Removed => "- ",
                    BlockKind::Added => "+ ",
                };
                format!("{prefix}{body}")
            }
        }
    }

    pub fn fragment(&self, fragment: &Fragment) -> String {
        match (self, fragment) {
            (Markup::Html, Fragment::Inline(blocks)) => {
                let body: String = blocks.iter().map(|block| self.block(block)).collect();
                format!("<div class=\"diff inline\">{body}</div>")
            }
            (Markup::Html, Fragment::SideBySide { old, new }) => {
                // Cells alternate old/new so each grid row keeps a sentence
                // pair at the same height.
                let body: String = old
                    .iter()
                    .zip(new)
                    .map(|(left, right)| format!("{}{}", self.block(left), self.block(right)))
                    .collect();
                format!("<div class=\"diff side-by-side\">{body}</div>")
            }
            (Markup::Text { .. }, Fragment::Inline(blocks)) => blocks
                .iter()
                .map(|block| self.block(block))
                .collect::<Vec<_>>()
                .join("\n"),
            (Markup::Text { .. }, Fragment::SideBySide { old, new }) => {
                let left: Vec<String> = old.iter().map(|block| self.block(block)).collect();
                let width = left
                    .iter()
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                left.iter()
                    .zip(new)
                    .map(|(cell, right)| {
                        let line = format!("{cell:<width$} | {}", self.block(right));
                        line.trim_end().to_string()
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, ViewMode};

    #[test]
    fn html_escapes_field_text() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
        let span = Span::added("a < b");
        assert_eq!(
            markup_for(Format::Html).span(&span),
            "<ins class=\"word-added\">a &lt; b</ins>"
        );
    }

    #[test]
    fn html_changed_block_nests_word_markers() {
        let fragment = render("The fee is $100.", "The fee is $150.", ViewMode::Inline);
        assert_eq!(
            markup_for(Format::Html).fragment(&fragment),
            "<div class=\"diff inline\"><div class=\"block changed\">The fee is \
             <del class=\"word-removed\">$100.</del> <ins class=\"word-added\">$150.</ins>\
             </div></div>"
        );
    }

    #[test]
    fn html_side_by_side_interleaves_cells() {
        let fragment = render("Clause one. Clause two.", "Clause one.", ViewMode::SideBySide);
        let html = markup_for(Format::Html).fragment(&fragment);
        assert_eq!(
            html,
            "<div class=\"diff side-by-side\">\
             <div class=\"block\">Clause one.</div><div class=\"block\">Clause one.</div>\
             <div class=\"block removed\">Clause two.</div><div class=\"block filler\">&nbsp;</div>\
             </div>"
        );
    }

    #[test]
    fn text_inline_uses_wdiff_markers() {
        let fragment = render(
            "Intro. The fee is $100. Old tail.",
            "Intro. The fee is $150.",
            ViewMode::Inline,
        );
        assert_eq!(
            markup_for(Format::Text).fragment(&fragment),
            "  Intro.\n~ The fee is [-$100.-] {+$150.+}\n- Old tail."
        );
    }

    #[test]
    fn text_side_by_side_pads_left_column() {
        let fragment = render("", "New clause added.", ViewMode::SideBySide);
        assert_eq!(
            markup_for(Format::Text).fragment(&fragment),
            "   | + New clause added."
        );

        let fragment = render("Keep. Gone.", "Keep.", ViewMode::SideBySide);
        assert_eq!(
            markup_for(Format::Text).fragment(&fragment),
            "  Keep. |   Keep.\n- Gone. |"
        );
    }

    #[test]
    fn extensions_follow_format() {
        assert_eq!(Format::Html.extension(), "html");
        assert_eq!(Format::Text.extension(), "txt");
    }
}
