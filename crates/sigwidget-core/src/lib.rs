//! Signature widget objects for incremental PDF updates
//!
//! This crate builds the two objects an incremental signing revision adds
//! on top of an already-parsed document: the signature field widget
//! annotation, and the revised page whose `/Annots` array points at it.
//! Parsing the base document, signing, and writing the final revision
//! (xref and trailer) are handled elsewhere.
//!
//! - [`AnnotationBuilder`]: visible or invisible signature widget
//! - [`IncrementalPageUpdater`]: host page with the new annotation appended
//! - [`PageLocator`]: 1-based page lookup through the page tree

pub mod allocator;
pub mod annotation;
pub mod appearance;
pub mod config;
pub mod context;
pub mod encode;
pub mod error;
pub mod flags;
pub mod page_locator;
pub mod page_update;

#[cfg(test)]
mod test_support;

pub use allocator::{AllocationError, ObjectAllocator, SessionAllocator};
pub use annotation::AnnotationBuilder;
pub use appearance::{AppearanceError, AppearanceGenerator, SimpleAppearance};
pub use config::FieldConfig;
pub use context::{count_existing_signatures, SignContext};
pub use error::{CollaboratorError, SigWidgetError};
pub use page_locator::{LocatedPage, PageLocator};
pub use page_update::IncrementalPageUpdater;
