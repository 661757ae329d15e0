use clap::ValueEnum;

use crate::align::{align, pair_replace, OpKind, Pairing};
use crate::highlight::{highlight_merged, highlight_words, Span};
use crate::segment::segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ViewMode {
    /// Single column, changes stacked in sequence
    #[default]
    Inline,
    /// Old and new text in two aligned columns
    SideBySide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Unchanged,
    Changed,
    Removed,
    Added,
    /// Empty placeholder keeping side-by-side columns aligned.
    Filler,
}

/// One sentence-level block of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub spans: Vec<Span>,
}

impl Block {
    fn sentence(kind: BlockKind, sentence: &str) -> Block {
        Block {
            kind,
            spans: vec![Span::plain(sentence)],
        }
    }

    fn changed(spans: Vec<Span>) -> Block {
        Block {
            kind: BlockKind::Changed,
            spans,
        }
    }

    fn filler() -> Block {
        Block {
            kind: BlockKind::Filler,
            spans: Vec::new(),
        }
    }

    /// The block's words without any marking.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|span| span.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The rendered diff of one field in one view mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Inline(Vec<Block>),
    SideBySide { old: Vec<Block>, new: Vec<Block> },
}

/// Sentence-level outcome shared by both view modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SentenceEdit<'a> {
    Same(&'a str),
    Changed(&'a str, &'a str),
    Removed(&'a str),
    Added(&'a str),
}

fn sentence_edits<'a>(old_text: &'a str, new_text: &'a str) -> Vec<SentenceEdit<'a>> {
    let old = segment(old_text);
    let new = segment(new_text);
    let mut edits = Vec::new();

    for op in align(&old, &new) {
        match op.kind {
            OpKind::Equal => edits.extend(old[op.old_range].iter().map(|&s| SentenceEdit::Same(s))),
            OpKind::Delete => {
                edits.extend(old[op.old_range].iter().map(|&s| SentenceEdit::Removed(s)))
            }
            OpKind::Insert => {
                edits.extend(new[op.new_range].iter().map(|&s| SentenceEdit::Added(s)))
            }
            OpKind::Replace => {
                for pairing in pair_replace(&op) {
                    edits.push(match pairing {
                        Pairing::Changed { old: i, new: j } => changed_pair(old[i], new[j]),
                        Pairing::Removed(i) => SentenceEdit::Removed(old[i]),
                        Pairing::Added(j) => SentenceEdit::Added(new[j]),
                    });
                }
            }
        }
    }
    edits
}

// A blank sentence paired with real text is a plain insertion or deletion,
// e.g. an empty field gaining its first clause.
fn changed_pair<'a>(old: &'a str, new: &'a str) -> SentenceEdit<'a> {
    match (old.trim().is_empty(), new.trim().is_empty()) {
        (true, true) => SentenceEdit::Same(old),
        (true, false) => SentenceEdit::Added(new),
        (false, true) => SentenceEdit::Removed(old),
        (false, false) => SentenceEdit::Changed(old, new),
    }
}

/// Renders a single stream of blocks in sentence order.
pub fn render_inline(old_text: &str, new_text: &str) -> Vec<Block> {
    sentence_edits(old_text, new_text)
        .into_iter()
        .map(|edit| match edit {
            SentenceEdit::Same(s) => Block::sentence(BlockKind::Unchanged, s),
            SentenceEdit::Changed(o, n) => Block::changed(highlight_merged(o, n)),
            SentenceEdit::Removed(s) => Block::sentence(BlockKind::Removed, s),
            SentenceEdit::Added(s) => Block::sentence(BlockKind::Added, s),
        })
        .collect()
}

/// Renders two columns that always hold the same number of blocks.
pub fn render_side_by_side(old_text: &str, new_text: &str) -> (Vec<Block>, Vec<Block>) {
    let mut old_column = Vec::new();
    let mut new_column = Vec::new();

    for edit in sentence_edits(old_text, new_text) {
        let (left, right) = match edit {
            SentenceEdit::Same(s) => (
                Block::sentence(BlockKind::Unchanged, s),
                Block::sentence(BlockKind::Unchanged, s),
            ),
            SentenceEdit::Changed(o, n) => {
                let highlight = highlight_words(o, n);
                (Block::changed(highlight.old), Block::changed(highlight.new))
            }
            SentenceEdit::Removed(s) => (Block::sentence(BlockKind::Removed, s), Block::filler()),
            SentenceEdit::Added(s) => (Block::filler(), Block::sentence(BlockKind::Added, s)),
        };
        old_column.push(left);
        new_column.push(right);
    }

    debug_assert_eq!(old_column.len(), new_column.len());
    (old_column, new_column)
}

pub fn render(old_text: &str, new_text: &str, mode: ViewMode) -> Fragment {
    match mode {
        ViewMode::Inline => Fragment::Inline(render_inline(old_text, new_text)),
        ViewMode::SideBySide => {
            let (old, new) = render_side_by_side(old_text, new_text);
            Fragment::SideBySide { old, new }
        }
    }
}
