use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glob::Pattern;

use crate::dataset::DEFAULT_KEY_COLUMN;
use crate::markup::Format;
use crate::render::ViewMode;
use crate::report::DEFAULT_TITLE;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset file (JSON array of records)
    pub dataset: PathBuf,

    /// Record to compare from (Document A)
    pub record_a: String,

    /// Record to compare to (Document B)
    pub record_b: String,

    /// Output directory for the reports
    pub output_dir: PathBuf,

    /// Fields to compare, as names or glob patterns (repeatable; default: all text fields)
    #[arg(short, long = "field", num_args = 1..)]
    pub fields: Vec<String>,

    /// Column holding the record identifiers
    #[arg(short, long, default_value = DEFAULT_KEY_COLUMN)]
    pub key_column: String,

    /// Diff presentation
    #[arg(short, long, value_enum, default_value_t = ViewMode::Inline)]
    pub mode: ViewMode,

    /// Output document format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    pub format: Format,

    /// Title of the full report
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Only write the full report, not one document per changed field
    #[arg(long)]
    pub no_per_field: bool,

    /// Do not write anything; only print which fields differ
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct Options {
    pub field_patterns: Vec<Pattern>,
    pub key_column: String,
    pub mode: ViewMode,
    pub format: Format,
    pub title: String,
    pub per_field: bool,
    pub dry_run: bool,
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .fields
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid field pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Options {
        field_patterns: patterns,
        key_column: args.key_column.clone(),
        mode: args.mode,
        format: args.format,
        title: args.title.clone(),
        per_field: !args.no_per_field,
        dry_run: args.dry_run,
    })
}
