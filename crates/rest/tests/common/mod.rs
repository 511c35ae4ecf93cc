//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server over in-memory repositories
//! - [`assertions`] - HTTP response assertions

#![allow(dead_code)]

pub mod assertions;
pub mod harness;
