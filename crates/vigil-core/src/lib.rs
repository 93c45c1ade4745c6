//! Core types and trait definitions for the Vigil exam scheduling engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod booking;
pub mod error;
pub mod exam;
pub mod hall;
pub mod identity;
pub mod preference;
pub mod session;
pub mod store;

pub use error::{Error, ErrorKind, Result};
