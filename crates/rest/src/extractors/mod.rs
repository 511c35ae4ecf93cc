//! Axum extractors for the todo endpoints.
//!
//! - [`Paging`] - Extract `$skip`/`$top` and the absolute request URI

mod paging;

pub use paging::Paging;
