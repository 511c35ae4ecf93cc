//! Route configuration for the todo REST API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod todo_routes;

pub use todo_routes::create_routes;
