//! Domain Layer - Core Entity Trait
//!
//! Contract the list controller needs from anything it keeps in sync.

use std::fmt::Debug;

use crate::error::SyncResult;

/// Core trait for all synchronized entities
pub trait Entity: Clone + Debug + PartialEq + 'static {
    /// Fields supplied when creating a new entity
    type Draft: Clone + Debug;
    /// Partial update; `None` fields are left untouched
    type Patch: Clone + Debug;

    /// Server-assigned identifier (or a temporary one before confirmation)
    fn id(&self) -> &str;

    /// Local stand-in shown until the server answers a create
    fn provisional(id: String, draft: &Self::Draft) -> Self;

    /// Apply a patch in place
    fn apply(&mut self, patch: &Self::Patch);

    /// Reject drafts the backend would refuse anyway
    fn validate_draft(_draft: &Self::Draft) -> SyncResult<()> {
        Ok(())
    }

    fn validate_patch(_patch: &Self::Patch) -> SyncResult<()> {
        Ok(())
    }
}
