use std::time::Duration;

/// Configuration for a document store instance.
///
/// Both deadlines default to `None`: a re-fit over a large corpus reprocesses
/// every document, so unbounded waits are the safe default and callers opt
/// into deadlines explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreConfig {
    /// Deadline for a single corpus fit call.
    pub fit_timeout: Option<Duration>,

    /// Deadline for a single query inference call.
    pub infer_timeout: Option<Duration>,
}

impl StoreConfig {
    #[must_use]
    pub fn with_deadlines(fit_timeout: Duration, infer_timeout: Duration) -> Self {
        Self {
            fit_timeout: Some(fit_timeout),
            infer_timeout: Some(infer_timeout),
        }
    }
}
