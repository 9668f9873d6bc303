/// Convenience result type used across scrollweave.
pub type ScrollweaveResult<T> = Result<T, ScrollweaveError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only build/register-time failures surface here. Per-frame problems such as a
/// target element that vanished mid-animation are logged and skipped instead.
#[derive(thiserror::Error, Debug)]
pub enum ScrollweaveError {
    /// Malformed or contradictory animation configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Layout compensation bookkeeping went out of sync.
    #[error("layout error: {0}")]
    Layout(String),

    /// Evaluation requested against an unknown or disposed handle.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing scene descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollweaveError {
    /// Build a [`ScrollweaveError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ScrollweaveError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`ScrollweaveError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`ScrollweaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<serde_json::Error> for ScrollweaveError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
