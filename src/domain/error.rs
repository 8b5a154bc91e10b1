//! Domain error types.

/// A lookback window that the available price history cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("insufficient history for {indicator}: need {required} bars, have {available}")]
pub struct InsufficientHistory {
    pub indicator: String,
    pub required: usize,
    pub available: usize,
}

impl InsufficientHistory {
    /// `Ok(())` when `available` bars cover a `required`-bar window.
    pub fn check(indicator: &str, required: usize, available: usize) -> Result<(), Self> {
        if available >= required {
            Ok(())
        } else {
            Err(Self {
                indicator: indicator.to_string(),
                required,
                available,
            })
        }
    }
}

/// Top-level error type for marketscout.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("http error: {reason}")]
    Http { reason: String },

    #[error("authentication failed for {username}: {reason}")]
    Auth { username: String, reason: String },

    #[error("failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("unknown stock list: {0}")]
    UnknownList(String),

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    InsufficientHistory(#[from] InsufficientHistory),

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScoutError {
    pub fn parse(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ScoutError::Parse {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<&ScoutError> for std::process::ExitCode {
    fn from(err: &ScoutError) -> Self {
        let code: u8 = match err {
            ScoutError::Io(_) | ScoutError::Http { .. } => 1,
            ScoutError::ConfigParse { .. }
            | ScoutError::ConfigMissing { .. }
            | ScoutError::ConfigInvalid { .. } => 2,
            ScoutError::Auth { .. } => 3,
            ScoutError::Parse { .. }
            | ScoutError::InvalidSeries { .. }
            | ScoutError::UnknownList(_) => 4,
            ScoutError::NoData { .. } | ScoutError::InsufficientHistory(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
