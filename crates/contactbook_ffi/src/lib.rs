//! FFI bridge crate for the mobile UI.
//!
//! # Responsibility
//! - Re-export the use-case API consumed by the UI through
//!   flutter_rust_bridge.
//! - Keep generated bindings isolated from core business logic.

pub mod api;
