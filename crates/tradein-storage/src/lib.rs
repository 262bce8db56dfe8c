//! Trade-In Storage Library
//!
//! This crate provides the photo storage abstraction and its local
//! filesystem implementation. The intake pipeline only ever talks to the
//! `Storage` trait, so a remote asset store can be swapped in without
//! touching pipeline code.
//!
//! # Storage key format
//!
//! Keys are flat: `photos/{filename}`. Keys must not contain `..` or a
//! leading `/`.

pub mod factory;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
