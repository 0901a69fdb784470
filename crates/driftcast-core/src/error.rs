use thiserror::Error;

/// Validation and contract errors exposed by `driftcast-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid time unit '{value}', expected one of days, weeks, months, years")]
    InvalidTimeUnit { value: String },
    #[error("invalid source '{value}', expected one of yahoo, fixture")]
    InvalidSource { value: String },
    #[error("invalid resolution strategy '{value}', expected one of search, catalog")]
    InvalidStrategy { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("price series dates must be strictly increasing (at index {index})")]
    UnorderedSeries { index: usize },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,

    #[error("configuration value '{key}' is invalid: '{value}'")]
    InvalidConfig { key: &'static str, value: String },
}
