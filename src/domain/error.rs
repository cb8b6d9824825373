//! Domain error types.

/// Top-level error type for candlebot.
#[derive(Debug, thiserror::Error)]
pub enum CandlebotError {
    #[error("no such indicators: {}", .names.join(", "))]
    UnknownIndicator { names: Vec<String> },

    #[error("no such strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("column {column} is missing; compute the indicator before evaluating")]
    MissingColumn { column: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data: have {rows} rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("invalid timeframe {value:?}")]
    InvalidTimeframe { value: String },

    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp { value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CandlebotError> for std::process::ExitCode {
    fn from(err: &CandlebotError) -> Self {
        let code: u8 = match err {
            CandlebotError::Io(_) => 1,
            CandlebotError::ConfigParse { .. }
            | CandlebotError::ConfigMissing { .. }
            | CandlebotError::ConfigInvalid { .. }
            | CandlebotError::InvalidTimeframe { .. }
            | CandlebotError::InvalidTimestamp { .. } => 2,
            CandlebotError::Data { .. } => 3,
            CandlebotError::UnknownIndicator { .. }
            | CandlebotError::UnknownStrategy { .. }
            | CandlebotError::MissingColumn { .. } => 4,
            CandlebotError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
