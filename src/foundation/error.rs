/// Convenience result type used across scedit.
pub type ScResult<T> = Result<T, ScError>;

/// Top-level error taxonomy for loading, editing, rendering and saving containers.
#[derive(thiserror::Error, Debug)]
pub enum ScError {
    /// Truncated stream, impossible declared length or unreadable header.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// Pixel data was required from a texture whose codec tag is not supported.
    #[error("unsupported pixel format tag {0}")]
    UnsupportedPixelFormat(u8),

    /// A chunk polygon cannot provide an affine basis (fewer than three points, or collinear).
    #[error("degenerate chunk: {0}")]
    DegenerateChunk(String),

    /// A new export name is empty or already taken.
    #[error("name conflict: {0}")]
    NameConflict(String),

    /// A lookup by id, index or name found nothing.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Caller-provided data does not fit the container format.
    #[error("validation error: {0}")]
    Validation(String),

    /// Read or write failure on a backing file or output stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScError {
    /// Build a [`ScError::MalformedContainer`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedContainer(msg.into())
    }

    /// Build a [`ScError::DegenerateChunk`] value.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateChunk(msg.into())
    }

    /// Build a [`ScError::NameConflict`] value.
    pub fn name_conflict(msg: impl Into<String>) -> Self {
        Self::NameConflict(msg.into())
    }

    /// Build a [`ScError::UnknownEntity`] value.
    pub fn unknown_entity(msg: impl Into<String>) -> Self {
        Self::UnknownEntity(msg.into())
    }

    /// Build a [`ScError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
