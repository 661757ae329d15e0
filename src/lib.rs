//
// lib.rs
// recdiff
//
// Library entry that re-exports modules so the binary and any external users can reach segmentation, alignment, rendering and report assembly.
//
// Thales Matheus Mendonça Santos - November 2025
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod align;
pub mod cli;
pub mod dataset;
pub mod diff;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod markup;
pub mod render;
pub mod report;
pub mod segment;
pub mod utils;

pub use align::{align, pair_replace, EditOp, OpKind, Pairing};
pub use cli::{build_options, Args, Options};
pub use diff::{
    compare, diff_field, CompareRequest, Comparison, Counters, FieldDiff, FieldStatus, TextField,
};
pub use error::CompareError;
pub use highlight::{highlight_merged, highlight_words, Span, SpanKind, SplitHighlight};
pub use markup::Format;
pub use render::{render, Block, BlockKind, Fragment, ViewMode};
pub use report::{build_report, standalone_document, Report, ReportMetadata};
pub use segment::segment;
