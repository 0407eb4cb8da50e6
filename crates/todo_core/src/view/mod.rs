//! View layer: display filtering and user-gesture flows.
//!
//! # Responsibility
//! - Derive the displayed subset from the full collection on every render.
//! - Translate user gestures into repository calls and keep local UI state.
//!
//! # Invariants
//! - The filtered subset is never stored; it is recomputed from
//!   `(collection, mode)`.
//! - At most one item is in edit mode.

pub mod filter;
pub mod list_view;
