//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for contact aggregates.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Multi-row writes happen inside a single transaction; a failed write
//!   leaves no partial aggregate behind.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors; reads of a missing id are `Ok(None)`.

pub mod contact_repo;
