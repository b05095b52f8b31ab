//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QtabError {
    /// A lookup hit a state-action pair that was never initialized.
    ///
    /// `action` is `None` when no action was registered at all, which happens
    /// when an algorithm is used before [`Algorithm::init`](crate::Algorithm::init).
    #[error(
        "Q-value not found for state {state:?} and action {}",
        .action.as_deref().map(|a| format!("{:?}", a)).unwrap_or_else(|| "<any>".to_string())
    )]
    NotFound {
        /// Name of the state.
        state: String,

        /// Name of the action.
        action: Option<String>,
    },

    /// A policy or an algorithm was given a configuration it cannot work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A state or action was looked up with a name that was never registered.
    #[error("Unknown identifier: {0:?}")]
    UnknownIdentifier(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

impl QtabError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
