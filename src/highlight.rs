use crate::align::{align, OpKind};
use crate::segment::words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Plain,
    Removed,
    Added,
}

/// A run of words sharing one marking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Span {
        Span {
            kind: SpanKind::Plain,
            text: text.into(),
        }
    }

    pub fn removed(text: impl Into<String>) -> Span {
        Span {
            kind: SpanKind::Removed,
            text: text.into(),
        }
    }

    pub fn added(text: impl Into<String>) -> Span {
        Span {
            kind: SpanKind::Added,
            text: text.into(),
        }
    }
}

/// Word-level highlight of a sentence pair, one span list per side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitHighlight {
    pub old: Vec<Span>,
    pub new: Vec<Span>,
}

fn push_words(spans: &mut Vec<Span>, kind: SpanKind, words: &[&str]) {
    if words.is_empty() {
        return;
    }
    spans.push(Span {
        kind,
        text: words.join(" "),
    });
}

/// Highlights a replaced sentence pair as two independent span lists.
///
/// Removed words are marked on the old side only and added words on the new
/// side only; matching words stay plain on both.
pub fn highlight_words(old_sentence: &str, new_sentence: &str) -> SplitHighlight {
    let old_words = words(old_sentence);
    let new_words = words(new_sentence);
    let mut highlight = SplitHighlight::default();

    for op in align(&old_words, &new_words) {
        let old_part = &old_words[op.old_range.clone()];
        let new_part = &new_words[op.new_range.clone()];
        match op.kind {
            OpKind::Equal => {
                push_words(&mut highlight.old, SpanKind::Plain, old_part);
                push_words(&mut highlight.new, SpanKind::Plain, new_part);
            }
            OpKind::Delete => push_words(&mut highlight.old, SpanKind::Removed, old_part),
            OpKind::Insert => push_words(&mut highlight.new, SpanKind::Added, new_part),
            OpKind::Replace => {
                push_words(&mut highlight.old, SpanKind::Removed, old_part);
                push_words(&mut highlight.new, SpanKind::Added, new_part);
            }
        }
    }
    highlight
}

/// Highlights a replaced sentence pair as one merged span list.
///
/// Removed words come right before the words that replace them.
pub fn highlight_merged(old_sentence: &str, new_sentence: &str) -> Vec<Span> {
    let old_words = words(old_sentence);
    let new_words = words(new_sentence);
    let mut spans = Vec::new();

    for op in align(&old_words, &new_words) {
        let old_part = &old_words[op.old_range.clone()];
        let new_part = &new_words[op.new_range.clone()];
        match op.kind {
            OpKind::Equal => push_words(&mut spans, SpanKind::Plain, new_part),
            OpKind::Delete => push_words(&mut spans, SpanKind::Removed, old_part),
            OpKind::Insert => push_words(&mut spans, SpanKind::Added, new_part),
            OpKind::Replace => {
                push_words(&mut spans, SpanKind::Removed, old_part);
                push_words(&mut spans, SpanKind::Added, new_part);
            }
        }
    }
    spans
}
