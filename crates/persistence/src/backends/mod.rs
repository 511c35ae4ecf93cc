//! Repository backend implementations.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | [`memory`] | always | Process-local map, for development and tests |
//! | [`document`] | `cosmos` for the HTTP client | One container per entity kind in a document store |
//!
//! Both implement [`Repository`](crate::core::Repository) for every
//! [`Entity`](crate::types::Entity) kind.

pub mod document;
pub mod memory;

pub use document::{DocumentRepository, DocumentStore, DocumentStoreConfig};
pub use memory::MemoryRepository;
