use thiserror::Error;

pub type PtResult<T> = Result<T, PtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid facet id {value}: facet ids start at 1")]
    InvalidFacetId { value: u32 },
}
