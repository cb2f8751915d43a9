//! Domain error types.

/// Top-level error type for niveshsaathi.
///
/// Ledger and questionnaire errors are precondition failures: they are raised
/// before any mutation, so state is unchanged whenever one is returned.
#[derive(Debug, thiserror::Error)]
pub enum SaathiError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("share count must be a positive whole number")]
    InvalidShareCount,

    #[error("insufficient funds: need {required:.2}, have {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("no holding for {symbol}")]
    NoSuchHolding { symbol: String },

    #[error("insufficient shares of {symbol}: hold {held}, asked to sell {requested}")]
    InsufficientShares {
        symbol: String,
        held: u32,
        requested: u32,
    },

    #[error("incomplete questionnaire: {reason}")]
    IncompleteQuestionnaire { reason: String },

    #[error("questionnaire already complete; restart to answer again")]
    QuestionnaireComplete,

    #[error("no learning module with slug {slug}")]
    ModuleNotFound { slug: String },

    #[error("generation request failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("speech synthesis failed: {reason}")]
    SynthesisFailed { reason: String },

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

impl From<&SaathiError> for std::process::ExitCode {
    fn from(err: &SaathiError) -> Self {
        let code: u8 = match err {
            SaathiError::Io(_) => 1,
            SaathiError::ConfigParse { .. }
            | SaathiError::ConfigMissing { .. }
            | SaathiError::ConfigInvalid { .. } => 2,
            SaathiError::UnknownSymbol { .. }
            | SaathiError::InvalidShareCount
            | SaathiError::InsufficientFunds { .. }
            | SaathiError::NoSuchHolding { .. }
            | SaathiError::InsufficientShares { .. } => 3,
            SaathiError::IncompleteQuestionnaire { .. }
            | SaathiError::QuestionnaireComplete => 4,
            SaathiError::GenerationFailed { .. } | SaathiError::SynthesisFailed { .. } => 5,
            SaathiError::ModuleNotFound { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
