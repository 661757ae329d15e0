use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use recdiff::dataset::{build_fields, load_dataset, Dataset, Record};
use recdiff::report::{build_report, standalone_document};
use recdiff::utils::{avoid_collision, sanitize_file_component};
use recdiff::{build_options, compare, logging, Args, CompareRequest, Comparison, Options};

// Longest id list shown when a record lookup fails.
const MAX_LISTED_IDS: usize = 20;

fn lookup_record<'a>(dataset: &'a Dataset, key_column: &str, id: &str) -> Result<&'a Record> {
    dataset.find_record(key_column, id).with_context(|| {
        let ids = dataset.record_ids(key_column);
        let mut listed = ids
            .iter()
            .take(MAX_LISTED_IDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if ids.len() > MAX_LISTED_IDS {
            listed.push_str(&format!(" and {} more", ids.len() - MAX_LISTED_IDS));
        }
        format!("No record with {key_column} = {id} (available: {listed})")
    })
}

fn report_path(out_root: &Path, stem: &str, opts: &Options) -> PathBuf {
    avoid_collision(&out_root.join(format!("{stem}.{}", opts.format.extension())))
}

fn write_reports(
    comparison: &Comparison,
    out_root: &Path,
    opts: &Options,
) -> Result<Vec<PathBuf>> {
    let meta = &comparison.report.metadata;
    let stem = format!(
        "Diff_Report_{}_vs_{}",
        sanitize_file_component(&meta.old_record_id),
        sanitize_file_component(&meta.new_record_id)
    );
    let mut written = Vec::new();

    let full_path = report_path(out_root, &stem, opts);
    fs::write(&full_path, build_report(&comparison.report, opts.format))
        .with_context(|| format!("Cannot write {}", full_path.display()))?;
    written.push(full_path);

    if opts.per_field {
        let title = meta.standalone_title();
        for section in comparison.report.sections() {
            let path = report_path(
                out_root,
                &format!("{stem}_{}", sanitize_file_component(&section.field)),
                opts,
            );
            fs::write(&path, standalone_document(&title, &section.fragment, opts.format))
                .with_context(|| format!("Cannot write {}", path.display()))?;
            written.push(path);
        }
    }
    Ok(written)
}

fn main() -> Result<()> {
    logging::init("recdiff=warn");

    let args = Args::parse();
    let opts = build_options(&args)?;

    let dataset = load_dataset(&args.dataset)?;
    let record_a = lookup_record(&dataset, &opts.key_column, &args.record_a)?;
    let record_b = lookup_record(&dataset, &opts.key_column, &args.record_b)?;

    let field_names = dataset.select_fields(&opts.field_patterns)?;
    let request = CompareRequest {
        old_record_id: args.record_a.trim().to_string(),
        new_record_id: args.record_b.trim().to_string(),
        fields: build_fields(record_a, record_b, &field_names),
        mode: opts.mode,
        title: opts.title.clone(),
        generated_at: Local::now().naive_local(),
    };
    let comparison = compare(&request)?;
    let changed = comparison.changed_fields();

    if opts.dry_run {
        println!("== DRY RUN ==");
        println!("Fields compared:      {}", comparison.counters.compared);
        for name in &changed {
            println!("Would report:         {name}");
        }
        return Ok(());
    }

    let out_root = &args.output_dir;
    if !out_root.exists() {
        fs::create_dir_all(out_root)
            .with_context(|| format!("Cannot create {}", out_root.display()))?;
    }
    let written = write_reports(&comparison, out_root, &opts)?;

    println!(
        "== recdiff: {} vs {} ==",
        request.old_record_id, request.new_record_id
    );
    println!("Compared:             {}", comparison.counters.compared);
    println!("Changed:              {}", comparison.counters.changed);
    println!("Unchanged (omitted):  {}", comparison.counters.unchanged);
    if changed.is_empty() {
        println!("No differences found in the selected fields.");
    } else {
        println!("Changed fields:       {}", changed.join(", "));
    }
    for path in &written {
        println!("Wrote:                {}", path.display());
    }

    Ok(())
}
