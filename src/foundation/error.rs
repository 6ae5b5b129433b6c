/// Crate-wide result alias.
pub type ScrollSyncResult<T> = Result<T, ScrollSyncError>;

/// Errors surfaced while installing or driving a scroll session.
///
/// Runtime degradation (missing targets, late assets, unresolved geometry) is never reported
/// through this type; it is logged and absorbed. Errors only come out of configuration and
/// registration.
#[derive(thiserror::Error, Debug)]
pub enum ScrollSyncError {
    /// Invalid configuration, threshold syntax or conflicting bindings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Vector-animation asset could not be loaded.
    #[error("asset error: {0}")]
    Asset(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollSyncError {
    /// Build a [`ScrollSyncError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollSyncError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ScrollSyncError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollSyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
