//! Approval file IO
//!
//! - `atomic`: temp→rename writes
//! - `fs_store`: approved reads, candidate writes, pending listing, promotion

pub mod atomic;
pub mod fs_store;
