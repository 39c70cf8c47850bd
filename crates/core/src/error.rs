#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Why an externally sourced record (payment post or user) was rejected.
///
/// Parsing yields one of these per record instead of aborting the batch, so
/// callers can drop or surface individual failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("missing required property '{0}'")]
    Missing(&'static str),

    #[error("property '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("property '{0}' must be greater than zero")]
    NotPositive(&'static str),

    #[error("unsupported currency '{0}'")]
    UnsupportedCurrency(String),
}
