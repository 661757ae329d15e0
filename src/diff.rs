use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::CompareError;
use crate::render::{render, Fragment, ViewMode};
use crate::report::{Report, ReportMetadata};

/// A named pair of values taken from the two records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub name: String,
    pub old: String,
    pub new: String,
}

impl TextField {
    pub fn new(name: impl Into<String>, old: Option<&str>, new: Option<&str>) -> TextField {
        TextField {
            name: name.into(),
            old: old.unwrap_or_default().to_string(),
            new: new.unwrap_or_default().to_string(),
        }
    }

    /// Whether the values differ once surrounding whitespace is ignored.
    pub fn has_changes(&self) -> bool {
        self.old.trim() != self.new.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub name: String,
    pub fragment: Option<Fragment>,
}

impl FieldDiff {
    pub fn had_changes(&self) -> bool {
        self.fragment.is_some()
    }
}

pub fn diff_field(field: &TextField, mode: ViewMode) -> FieldDiff {
    let fragment = if field.has_changes() {
        Some(render(&field.old, &field.new, mode))
    } else {
        None
    };
    FieldDiff {
        name: field.name.clone(),
        fragment,
    }
}

/// Everything one comparison needs; nothing is read from shared state.
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub old_record_id: String,
    pub new_record_id: String,
    pub fields: Vec<TextField>,
    pub mode: ViewMode,
    pub title: String,
    pub generated_at: NaiveDateTime,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub compared: usize,
    pub changed: usize,
    pub unchanged: usize,
}

/// Whether one compared field made it into the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatus {
    pub name: String,
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub report: Report,
    /// One entry per compared field, in selection order.
    pub statuses: Vec<FieldStatus>,
    pub counters: Counters,
}

impl Comparison {
    /// Names of the fields that made it into the report, in selection order.
    pub fn changed_fields(&self) -> Vec<&str> {
        self.report.fields().collect()
    }
}

pub fn compare(request: &CompareRequest) -> Result<Comparison, CompareError> {
    if request.old_record_id == request.new_record_id {
        return Err(CompareError::IdenticalRecords(request.old_record_id.clone()));
    }
    if request.fields.is_empty() {
        return Err(CompareError::NoFieldsSelected);
    }

    let mut report = Report::new(ReportMetadata {
        old_record_id: request.old_record_id.clone(),
        new_record_id: request.new_record_id.clone(),
        generated_at: request.generated_at,
        title: request.title.clone(),
    });
    let mut counters = Counters::default();
    let mut statuses = Vec::with_capacity(request.fields.len());

    for field in &request.fields {
        let FieldDiff { name, fragment } = diff_field(field, request.mode);
        counters.compared += 1;
        let changed = match fragment {
            Some(fragment) => {
                debug!(field = %name, "field changed");
                counters.changed += 1;
                report.push(&name, fragment);
                true
            }
            None => {
                debug!(field = %name, "field unchanged, skipped");
                counters.unchanged += 1;
                false
            }
        };
        statuses.push(FieldStatus { name, changed });
    }

    info!(
        old = %request.old_record_id,
        new = %request.new_record_id,
        compared = counters.compared,
        changed = counters.changed,
        "comparison finished"
    );

    Ok(Comparison {
        report,
        statuses,
        counters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BlockKind;
    use crate::report::DEFAULT_TITLE;
    use chrono::NaiveDate;

    fn request(fields: Vec<TextField>) -> CompareRequest {
        CompareRequest {
            old_record_id: "A-1".into(),
            new_record_id: "A-2".into(),
            fields,
            mode: ViewMode::Inline,
            title: DEFAULT_TITLE.into(),
            generated_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap(),
        }
    }

    #[test]
    fn absent_values_normalize_to_empty() {
        let field = TextField::new("Notes", None, None);
        assert_eq!(field.old, "");
        assert_eq!(field.new, "");
        assert!(!field.has_changes());
    }

    #[test]
    fn surrounding_whitespace_is_not_a_change() {
        let field = TextField::new("Scope", Some("  Same text. "), Some("Same text.\n"));
        assert!(!field.has_changes());
        assert!(!diff_field(&field, ViewMode::SideBySide).had_changes());
    }

    #[test]
    fn changed_field_gets_a_fragment() {
        let field = TextField::new("Scope", Some(""), Some("New clause added."));
        let diff = diff_field(&field, ViewMode::Inline);
        let Some(Fragment::Inline(blocks)) = diff.fragment else {
            panic!("expected an inline fragment");
        };
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Added);
    }

    #[test]
    fn identical_records_are_rejected() {
        let mut req = request(vec![TextField::new("Scope", Some("a"), Some("b"))]);
        req.new_record_id = req.old_record_id.clone();
        assert_eq!(
            compare(&req).unwrap_err(),
            CompareError::IdenticalRecords("A-1".into())
        );
    }

    #[test]
    fn empty_field_list_is_rejected() {
        assert_eq!(
            compare(&request(Vec::new())).unwrap_err(),
            CompareError::NoFieldsSelected
        );
    }

    #[test]
    fn unchanged_fields_are_left_out_of_the_report() {
        let comparison = compare(&request(vec![
            TextField::new("Fees", Some("The fee is $100."), Some("The fee is $150.")),
            TextField::new("Term", Some("One year."), Some(" One year. ")),
            TextField::new("Scope", Some("Clause one. Clause two."), Some("Clause one.")),
        ]))
        .unwrap();

        assert_eq!(comparison.changed_fields(), vec!["Fees", "Scope"]);
        assert_eq!(
            comparison.counters,
            Counters {
                compared: 3,
                changed: 2,
                unchanged: 1,
            }
        );
        let flags: Vec<bool> = comparison.statuses.iter().map(|s| s.changed).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(comparison.statuses[1].name, "Term");
    }
}
