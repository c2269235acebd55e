use pt_core::FieldKind;
use thiserror::Error;

/// Configuration errors raised by the condition registries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    #[error("{field} condition must be a {expected}, got a {found}")]
    InvalidValueKind {
        field: FieldKind,
        expected: &'static str,
        found: String,
    },

    #[error("{field} condition contains a non-finite value: {value}")]
    NonFinite { field: FieldKind, value: f64 },

    #[error("{field} condition has no target facets")]
    EmptyTarget { field: FieldKind },

    #[error("Initial condition for {missing} has not been set")]
    Unresolved { missing: FieldKind },
}

pub type ConditionResult<T> = Result<T, ConditionError>;
