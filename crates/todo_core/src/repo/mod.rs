//! Repository layer: the to-do storage access contract.
//!
//! # Responsibility
//! - Define the whole-collection data access operations.
//! - Keep JSON encoding and storage-key details out of the view layer.
//!
//! # Invariants
//! - Write paths validate inputs before touching storage.
//! - Stored-value anomalies degrade to an empty collection, never an error.

pub mod todo_repo;
