//! To-do domain model.
//!
//! # Responsibility
//! - Define the record shape shared by storage, view and FFI layers.
//!
//! # Invariants
//! - Every record is identified by a `TodoId` unique within its collection.
//! - A collection is insertion-ordered and persisted as one unit.

pub mod todo;
