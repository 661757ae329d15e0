use thiserror::Error;

/// Precondition failures of a comparison request.
///
/// Neither produces a partial report; the caller can fix the request and try
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("record {0} was selected on both sides; pick two different records")]
    IdenticalRecords(String),
    #[error("no fields were selected for comparison")]
    NoFieldsSelected,
}
