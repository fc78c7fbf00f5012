//! Catalogue domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by the record store and console.
//!
//! # Invariants
//! - Every persisted book is identified by a storage-assigned `BookId`.
//! - Deletion is permanent; there are no tombstones.

pub mod book;
