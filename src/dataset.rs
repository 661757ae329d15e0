use std::path::Path;

use anyhow::{bail, Context, Result};
use glob::Pattern;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::diff::TextField;
use crate::utils::read_text_best_effort;

pub const DEFAULT_KEY_COLUMN: &str = "Application Number";

// Columns whose values are shorter than this on average are labels, not prose.
const MIN_MEAN_TEXT_LEN: f64 = 40.0;

pub type Record = Map<String, Value>;

/// Records of a tabular export, columns in first-seen order.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
    columns: Vec<String>,
}

/// Renders a key cell as a record id. Only strings and numbers qualify.
pub fn record_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The textual value of a cell; null and missing cells are absent.
pub fn text_value<'a>(record: &'a Record, column: &str) -> Option<&'a str> {
    record.get(column).and_then(Value::as_str)
}

impl Dataset {
    pub fn from_json(text: &str) -> Result<Dataset> {
        let value: Value = serde_json::from_str(text).context("Dataset is not valid JSON")?;
        let Value::Array(items) = value else {
            bail!("Dataset must be a JSON array of records");
        };

        let mut dataset = Dataset::default();
        for (i, item) in items.into_iter().enumerate() {
            let Value::Object(record) = item else {
                bail!("Record #{i} is not a JSON object");
            };
            for column in record.keys() {
                if !dataset.columns.contains(column) {
                    dataset.columns.push(column.clone());
                }
            }
            dataset.records.push(record);
        }
        Ok(dataset)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn find_record(&self, key_column: &str, id: &str) -> Option<&Record> {
        let id = id.trim();
        self.records.iter().find(|record| {
            record
                .get(key_column)
                .and_then(record_id)
                .is_some_and(|key| key == id)
        })
    }

    /// Distinct record ids, sorted.
    pub fn record_ids(&self, key_column: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .records
            .iter()
            .filter_map(|record| record.get(key_column).and_then(record_id))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Whether a column holds free text: every non-null value is a string and
    /// the strings are long enough on average to read as prose.
    pub fn is_text_column(&self, column: &str) -> bool {
        let mut count = 0usize;
        let mut total_len = 0usize;
        for value in self.records.iter().filter_map(|record| record.get(column)) {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    count += 1;
                    total_len += s.chars().count();
                }
                _ => return false,
            }
        }
        count > 0 && total_len as f64 / count as f64 > MIN_MEAN_TEXT_LEN
    }

    pub fn text_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| self.is_text_column(column))
            .collect()
    }

    /// Resolves field patterns against the text columns.
    ///
    /// Fields come back in pattern order, dataset order within one pattern,
    /// each at most once. No patterns selects every text column.
    pub fn select_fields(&self, patterns: &[Pattern]) -> Result<Vec<String>> {
        let text_columns = self.text_columns();
        if patterns.is_empty() {
            return Ok(text_columns.iter().map(|c| c.to_string()).collect());
        }

        let mut selected: Vec<String> = Vec::new();
        for pattern in patterns {
            let matches: Vec<&str> = text_columns
                .iter()
                .copied()
                .filter(|column| pattern.as_str() == *column || pattern.matches(column))
                .collect();

            if matches.is_empty() {
                if self.columns.iter().any(|c| c == pattern.as_str()) {
                    bail!("Column '{}' is not a text column", pattern.as_str());
                }
                warn!(pattern = pattern.as_str(), "field pattern matched no text column");
                continue;
            }

            for column in matches {
                if !selected.iter().any(|s| s == column) {
                    selected.push(column.to_string());
                }
            }
        }
        debug!(fields = ?selected, "fields selected");
        Ok(selected)
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let text = read_text_best_effort(path)?;
    let dataset = Dataset::from_json(&text)
        .with_context(|| format!("Invalid dataset {}", path.display()))?;
    debug!(
        records = dataset.records.len(),
        columns = dataset.columns.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Pairs up the selected columns of two records.
pub fn build_fields(old: &Record, new: &Record, names: &[String]) -> Vec<TextField> {
    names
        .iter()
        .map(|name| TextField::new(name.as_str(), text_value(old, name), text_value(new, name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "The applicant shall pay the annual fee before the first of March.";
    const LONG_B: &str = "The applicant shall pay the annual fee before the first of April.";

    fn sample() -> Dataset {
        let json = serde_json::json!([
            {
                "Application Number": "WV-001",
                "Status": "Open",
                "Fee Terms": LONG_A,
                "Scope (General)": LONG_A,
                "Amount": 100
            },
            {
                "Application Number": 2024,
                "Status": "Closed",
                "Fee Terms": LONG_B,
                "Scope (General)": null,
                "Amount": 150
            }
        ]);
        Dataset::from_json(&json.to_string()).unwrap()
    }

    fn patterns(raw: &[&str]) -> Vec<Pattern> {
        raw.iter().map(|p| Pattern::new(p).unwrap()).collect()
    }

    #[test]
    fn keeps_column_order() {
        assert_eq!(
            sample().columns(),
            ["Application Number", "Status", "Fee Terms", "Scope (General)", "Amount"]
        );
    }

    #[test]
    fn finds_records_by_string_or_numeric_key() {
        let dataset = sample();
        let first = dataset.find_record(DEFAULT_KEY_COLUMN, "WV-001").unwrap();
        assert_eq!(text_value(first, "Status"), Some("Open"));
        let second = dataset.find_record(DEFAULT_KEY_COLUMN, " 2024 ").unwrap();
        assert_eq!(text_value(second, "Status"), Some("Closed"));
        assert!(dataset.find_record(DEFAULT_KEY_COLUMN, "missing").is_none());
        assert_eq!(dataset.record_ids(DEFAULT_KEY_COLUMN), vec!["2024", "WV-001"]);
    }

    #[test]
    fn only_long_string_columns_are_text() {
        assert_eq!(sample().text_columns(), vec!["Fee Terms", "Scope (General)"]);
    }

    #[test]
    fn selection_follows_pattern_order() {
        let dataset = sample();
        let fields = dataset
            .select_fields(&patterns(&["Scope*", "*Terms", "Scope (General)"]))
            .unwrap();
        assert_eq!(fields, vec!["Scope (General)", "Fee Terms"]);
        assert_eq!(
            dataset.select_fields(&[]).unwrap(),
            vec!["Fee Terms", "Scope (General)"]
        );
    }

    #[test]
    fn selecting_a_non_text_column_fails() {
        let err = sample().select_fields(&patterns(&["Amount"])).unwrap_err();
        assert!(err.to_string().contains("not a text column"));
    }

    #[test]
    fn unmatched_pattern_is_skipped() {
        let fields = sample()
            .select_fields(&patterns(&["Nothing*", "Fee Terms"]))
            .unwrap();
        assert_eq!(fields, vec!["Fee Terms"]);
    }

    #[test]
    fn null_cells_become_empty_text() {
        let dataset = sample();
        let old = &dataset.records()[0];
        let new = &dataset.records()[1];
        let fields = build_fields(old, new, &["Scope (General)".to_string()]);
        assert_eq!(fields[0].old, LONG_A);
        assert_eq!(fields[0].new, "");
    }

    #[test]
    fn rejects_non_array_input() {
        assert!(Dataset::from_json("{\"a\": 1}").is_err());
        assert!(Dataset::from_json("[1, 2]").is_err());
    }
}
