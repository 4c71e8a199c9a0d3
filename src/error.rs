use crate::symbol::{EccLevel, EncodeError, Version};

/// Failure to produce a module grid for some content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The content does not fit any version up to 40 at the requested level.
    #[error(
        "{bytes} bytes of content exceed the capacity of a version {max} symbol at level {level}",
        max = Version::MAX
    )]
    CapacityExceeded { level: EccLevel, bytes: usize },

    /// The encoder refused the content for a reason other than capacity.
    #[error(transparent)]
    Encoder(EncodeError),
}

/// Failure of a print or render call against a surface with error type `E`.
///
/// Surface errors are passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum RenderError<E> {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Surface(E),
}

impl<E> RenderError<E> {
    /// Returns `true` if the content could not be encoded at any version.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, RenderError::Search(SearchError::CapacityExceeded { .. }))
    }
}
