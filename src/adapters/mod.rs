// Adapters layer: concrete implementations of the domain ports for the hosted backend.

pub mod auth;
pub mod memory;
pub mod rest;
pub mod storage;

pub use auth::RestAuth;
pub use memory::InMemoryBackend;
pub use rest::{RestBackend, RestClient};
pub use storage::RestBlobStore;
