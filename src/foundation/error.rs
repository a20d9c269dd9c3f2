/// Convenience result type used across the editor core.
pub type EditorResult<T> = Result<T, EditorError>;

/// Top-level error taxonomy used by editor APIs.
///
/// Every variant is recoverable at the operation boundary that produced it; none of them leave
/// the [`crate::Scene`] in a partially mutated state.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// Invalid caller-provided data (bad color, gradient length, unknown element kind, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// An add operation hit the collection cap.
    #[error("capacity exceeded: at most {cap} {kind} allowed")]
    Capacity {
        /// Human-readable collection name (`"text elements"`, `"shapes"`, ...).
        kind: &'static str,
        /// The cap that was hit.
        cap: usize,
    },

    /// A referenced element does not exist in the scene.
    #[error("not found: {0}")]
    NotFound(String),

    /// A background or font resource could not be loaded or decoded.
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    /// Export could not produce an image.
    #[error("export error: {0}")]
    Export(String),

    /// External media lookup failed.
    #[error("media resolve error: {0}")]
    Resolve(String),

    /// Durable storage failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditorError {
    /// Build an [`EditorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`EditorError::Capacity`] value.
    pub fn capacity(kind: &'static str, cap: usize) -> Self {
        Self::Capacity { kind, cap }
    }

    /// Build an [`EditorError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build an [`EditorError::ResourceLoad`] value.
    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Build an [`EditorError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build an [`EditorError::Resolve`] value.
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::Resolve(msg.into())
    }

    /// Build an [`EditorError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build an [`EditorError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors that reject an operation without touching the scene
    /// (capacity, validation, not-found).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Capacity { .. } | Self::Validation(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
