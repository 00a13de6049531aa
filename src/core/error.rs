use thiserror::Error;

/// Errors that can occur while building drafts, loading rule tables,
/// or persisting the ledger.
///
/// Classification and aggregation never fail: ambiguity is reported through
/// [`Confidence`](crate::core::Confidence) and justification fields instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AutonomoError {
    /// The rule table is missing a rate, category, or condition.
    /// This is a configuration-integrity fault, never a data problem.
    #[error("rule table integrity error: {0}")]
    RuleTable(String),

    /// A ledger draft was invalid (negative base, deduction above 100%, ...).
    #[error("builder error: {0}")]
    Builder(String),

    /// The user profile carries out-of-range values.
    #[error("profile error: {0}")]
    Profile(String),

    /// Upstream document text could not be used at all.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The ledger file is unreadable or has an unexpected layout.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule table or extractor JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader/writer error.
    #[cfg(feature = "ledger")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
