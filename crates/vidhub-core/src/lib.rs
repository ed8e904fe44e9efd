//! Core types and trait definitions for vidhub.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain model, the [`store::MediaStore`] abstraction, the Ownership
//! Guard, and the operations every endpoint is built from.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod comment;
pub mod edge;
pub mod error;
pub mod identity;
pub mod media;
pub mod ops;
pub mod ownership;
pub mod playlist;
pub mod store;
pub mod tweet;
pub mod user;
pub mod validate;
pub mod video;

pub use error::{Error, Result};
