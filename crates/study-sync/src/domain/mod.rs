//! Domain Layer
//!
//! Entities exchanged with the backend and the vocabulary around them.

mod entity;
mod material;
mod status;
mod task;
mod user;

pub use entity::Entity;
pub use material::{document_mime, MaterialDraft, MaterialPatch, MaterialPayload, StudyMaterial, MAX_DOCUMENT_BYTES};
pub use status::{ApiStatus, DisplayStatus, StatusMapper};
pub use task::{Task, TaskDraft, TaskPatch};
pub use user::{Credentials, Registration, User};
