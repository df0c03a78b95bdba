//! Object identifier allocation for a signing session

use crate::error::CollaboratorError;
use lopdf::Document;
use thiserror::Error;
use tracing::debug;

/// Registers new object bodies and hands out fresh object numbers
///
/// Implementations must never return a number that collides with an
/// existing object of the base document or with an earlier allocation.
pub trait ObjectAllocator {
    fn add_object(&mut self, body: Vec<u8>) -> Result<u32, CollaboratorError>;
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Refusing to register an empty object body")]
    EmptyBody,

    #[error("Object number space exhausted")]
    Exhausted,
}

/// Allocator that numbers new objects after the base document's highest id
///
/// Allocated bodies are kept in allocation order for the incremental writer.
#[derive(Debug, Clone)]
pub struct SessionAllocator {
    next_id: u32,
    objects: Vec<(u32, Vec<u8>)>,
}

impl SessionAllocator {
    /// Start allocating at `first_id`
    pub fn starting_at(first_id: u32) -> Self {
        Self {
            next_id: first_id,
            objects: Vec::new(),
        }
    }

    /// Start allocating right after the highest object number in `doc`
    pub fn for_document(doc: &Document) -> Self {
        Self::starting_at(doc.max_id.saturating_add(1))
    }

    /// The number the next allocation will receive
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Objects allocated so far, in allocation order
    pub fn objects(&self) -> &[(u32, Vec<u8>)] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<(u32, Vec<u8>)> {
        self.objects
    }
}

impl ObjectAllocator for SessionAllocator {
    fn add_object(&mut self, body: Vec<u8>) -> Result<u32, CollaboratorError> {
        if body.is_empty() {
            return Err(AllocationError::EmptyBody.into());
        }
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(AllocationError::Exhausted)?;
        debug!(id, len = body.len(), "allocated object");
        self.objects.push((id, body));
        Ok(id)
    }
}
