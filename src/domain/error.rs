//! Domain error types.

/// Top-level error type for macross.
#[derive(Debug, thiserror::Error)]
pub enum MacrossError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("insufficient data for {ticker}: have {rows} rows, need {minimum}")]
    InsufficientData {
        ticker: String,
        rows: usize,
        minimum: usize,
    },

    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("undefined metric {metric}: return series has zero or undefined variance")]
    UndefinedMetric { metric: String },

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

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MacrossError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        MacrossError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&MacrossError> for std::process::ExitCode {
    fn from(err: &MacrossError) -> Self {
        let code: u8 = match err {
            MacrossError::Io(_) | MacrossError::Report { .. } => 1,
            MacrossError::ConfigParse { .. }
            | MacrossError::ConfigMissing { .. }
            | MacrossError::ConfigInvalid { .. } => 2,
            MacrossError::DataUnavailable { .. } => 3,
            MacrossError::InvalidParameter { .. } => 4,
            MacrossError::InsufficientData { .. } | MacrossError::UndefinedMetric { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
