//! Flutter bridge surface for the to-do core.
//!
//! Dart bindings are generated from `api` by `flutter_rust_bridge_codegen`.

pub mod api;
