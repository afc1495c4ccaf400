use thiserror::Error;

/// Failure to turn a pasted sheet into a record.
///
/// Everything short of an empty document is absorbed by the parser and shows
/// up only as missing fields in the result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("nothing to import: input contains no non-blank lines")]
    EmptyInput,
}
