//! Remote Layer
//!
//! Backend clients: the generic CRUD store trait, its HTTP implementations
//! for tasks and study materials, and the auth and assistant clients.

mod assistant;
mod auth;
mod http;
mod material_store;
mod task_store;
mod traits;


pub use assistant::{AssistantClient, Attachment};
pub use auth::AuthClient;
pub use http::HttpClient;
pub use material_store::HttpMaterialStore;
pub use task_store::HttpTaskStore;
pub use traits::{DraftOf, PatchOf, RemoteStore};
