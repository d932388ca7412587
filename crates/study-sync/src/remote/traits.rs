//! Remote Store - Core Trait
//!
//! CRUD contract for one backend resource. Futures are not `Send`: in the
//! browser everything runs on the single UI thread.

use async_trait::async_trait;

use crate::domain::Entity;
use crate::error::SyncResult;

/// Draft type of a store's entity
pub type DraftOf<S> = <<S as RemoteStore>::Entity as Entity>::Draft;
/// Patch type of a store's entity
pub type PatchOf<S> = <<S as RemoteStore>::Entity as Entity>::Patch;

/// One request/response exchange per call, no retries
#[async_trait(?Send)]
pub trait RemoteStore {
    type Entity: Entity;

    /// Fetch the whole collection
    async fn list(&self) -> SyncResult<Vec<Self::Entity>>;

    /// Create from a draft, returning the server's copy
    async fn create(&self, draft: &<Self::Entity as Entity>::Draft) -> SyncResult<Self::Entity>;

    /// Apply a partial update, returning the server's copy
    async fn update(&self, id: &str, patch: &<Self::Entity as Entity>::Patch) -> SyncResult<Self::Entity>;

    async fn delete(&self, id: &str) -> SyncResult<()>;
}
