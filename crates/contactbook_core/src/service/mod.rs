//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Drafts are validated here, before the store is touched; the repository
//!   trusts its inputs.

pub mod contact_service;
