use thiserror::Error;

/// Boxed error returned by external collaborators (allocator, appearance generator).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum SigWidgetError {
    #[error("Page {0} not found in page tree")]
    PageNotFound(u32),

    #[error("Failed to create appearance: {source}")]
    AppearanceGenerationFailed {
        #[source]
        source: CollaboratorError,
    },

    #[error("Failed to add appearance object: {source}")]
    ObjectAllocationFailed {
        #[source]
        source: CollaboratorError,
    },

    #[error("Failed to resolve document root: {0}")]
    RootResolutionFailed(String),

    #[error("Invalid signature rectangle: {0:?}")]
    InvalidRect([f64; 4]),

    #[error("Failed to encode object: {0}")]
    EncodingFailed(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

pub type Result<T> = std::result::Result<T, SigWidgetError>;
