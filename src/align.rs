use std::convert::Infallible;
use std::ops::Range;

use similar::algorithms::{myers, DiffHook, Replace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One alignment decision over a contiguous range of each sequence.
///
/// The ops returned by [`align`] partition both sequences: old ranges are
/// contiguous and cover `0..old.len()` in order, and likewise for new ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub kind: OpKind,
    pub old_range: Range<usize>,
    pub new_range: Range<usize>,
}

impl EditOp {
    pub fn new(kind: OpKind, old_range: Range<usize>, new_range: Range<usize>) -> EditOp {
        EditOp {
            kind,
            old_range,
            new_range,
        }
    }

    pub fn old_len(&self) -> usize {
        self.old_range.len()
    }

    pub fn new_len(&self) -> usize {
        self.new_range.len()
    }

    /// The same op seen from the other side: ranges swap and deletions
    /// become insertions.
    fn mirrored(self) -> EditOp {
        let kind = match self.kind {
            OpKind::Insert => OpKind::Delete,
            OpKind::Delete => OpKind::Insert,
            kind => kind,
        };
        EditOp::new(kind, self.new_range, self.old_range)
    }
}

#[derive(Default)]
struct OpCollector {
    ops: Vec<EditOp>,
}

impl OpCollector {
    fn push(&mut self, kind: OpKind, old_range: Range<usize>, new_range: Range<usize>) {
        if old_range.is_empty() && new_range.is_empty() {
            return;
        }
        if let Some(last) = self.ops.last_mut() {
            if last.kind == kind
                && last.old_range.end == old_range.start
                && last.new_range.end == new_range.start
            {
                last.old_range.end = old_range.end;
                last.new_range.end = new_range.end;
                return;
            }
        }
        self.ops.push(EditOp::new(kind, old_range, new_range));
    }
}

impl DiffHook for OpCollector {
    type Error = Infallible;

    fn equal(&mut self, old: usize, new: usize, len: usize) -> Result<(), Infallible> {
        self.push(OpKind::Equal, old..old + len, new..new + len);
        Ok(())
    }

    fn delete(&mut self, old: usize, old_len: usize, new: usize) -> Result<(), Infallible> {
        self.push(OpKind::Delete, old..old + old_len, new..new);
        Ok(())
    }

    fn insert(&mut self, old: usize, new: usize, new_len: usize) -> Result<(), Infallible> {
        self.push(OpKind::Insert, old..old, new..new + new_len);
        Ok(())
    }

    fn replace(
        &mut self,
        old: usize,
        old_len: usize,
        new: usize,
        new_len: usize,
    ) -> Result<(), Infallible> {
        self.push(OpKind::Replace, old..old + old_len, new..new + new_len);
        Ok(())
    }
}

fn myers_ops<T: PartialEq>(old: &[T], new: &[T]) -> Vec<EditOp> {
    let mut hook = Replace::new(OpCollector::default());
    if let Err(never) = myers::diff(&mut hook, old, 0..old.len(), new, 0..new.len()) {
        match never {}
    }
    hook.into_inner().ops
}

/// Aligns two sequences along a longest common subsequence.
///
/// Runs of deletions and insertions that sit between the same two matching
/// runs are folded into a single [`OpKind::Replace`]. Two empty inputs give a
/// single empty `Equal` op.
///
/// The diff always runs from the lesser sequence to the greater one, so when
/// several subsequences are equally long, `align(b, a)` is exactly the mirror
/// of `align(a, b)`.
pub fn align<T: Ord>(old: &[T], new: &[T]) -> Vec<EditOp> {
    let mut ops = if old <= new {
        myers_ops(old, new)
    } else {
        myers_ops(new, old)
            .into_iter()
            .map(EditOp::mirrored)
            .collect()
    };
    if ops.is_empty() {
        ops.push(EditOp::new(OpKind::Equal, 0..0, 0..0));
    }
    ops
}

/// How one position of a replace op is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    Changed { old: usize, new: usize },
    Removed(usize),
    Added(usize),
}

/// Pairs the elements of a replace op.
///
/// The first `min(old_len, new_len)` elements are paired index by index. What
/// is left over on the longer side follows as trailing removals (old side) or
/// additions (new side), so every element of the op is accounted for.
pub fn pair_replace(op: &EditOp) -> Vec<Pairing> {
    let paired = op.old_len().min(op.new_len());
    let mut pairings: Vec<Pairing> = op
        .old_range
        .clone()
        .zip(op.new_range.clone())
        .map(|(old, new)| Pairing::Changed { old, new })
        .collect();
    pairings.extend(op.old_range.clone().skip(paired).map(Pairing::Removed));
    pairings.extend(op.new_range.clone().skip(paired).map(Pairing::Added));
    pairings
}
