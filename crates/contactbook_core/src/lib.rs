//! Core domain logic for the contact book.
//! This crate is the single source of truth for business invariants.
//!
//! # Examples
//!
//! Saving and listing a contact aggregate:
//! ```
//! use contactbook_core::{
//!     db::open_db_in_memory,
//!     model::contact::{ContactDraft, PhoneDraft, PhoneType},
//!     repo::contact_repo::SqliteContactRepository,
//!     service::contact_service::ContactService,
//! };
//!
//! let mut conn = open_db_in_memory().expect("open db");
//! let repo = SqliteContactRepository::try_new(&mut conn).expect("ready connection");
//! let mut service = ContactService::new(repo);
//!
//! let draft = ContactDraft {
//!     title: "Alice".to_string(),
//!     phones: vec![PhoneDraft {
//!         number: "(11) 99999-8888".to_string(),
//!         kind: Some(PhoneType::Personal),
//!     }],
//! };
//! let id = service.save_contact(&draft).expect("save");
//!
//! let contacts = service.list_contacts().expect("list");
//! assert_eq!(contacts.len(), 1);
//! assert_eq!(contacts[0].id, id);
//! assert_eq!(contacts[0].phones[0].number, "11999998888");
//! ```
//!
//! Masking phone input as the user types:
//! ```
//! use contactbook_core::mask::{advance, MaskState};
//!
//! let outcome = advance(MaskState::Idle, "11999998888");
//! assert_eq!(outcome.buffer, "(11) 99999-8888");
//! assert_eq!(outcome.caret, 15);
//! assert!(!outcome.rejected);
//! ```
#![deny(missing_docs)]

/// SQLite bootstrap and schema migrations.
pub mod db;
/// Rolling file logging bootstrap.
pub mod logging;
/// Incremental phone number mask engine.
pub mod mask;
/// Contact aggregate model and draft validation.
pub mod model;
/// Repository contracts and SQLite implementation.
pub mod repo;
/// Use-case services over the repository layer.
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use mask::{advance, format_display, strip_non_digits, EditOutcome, MaskState, PhoneMask};
pub use model::contact::{
    Contact, ContactDraft, ContactId, ContactValidationError, NewContact, NewPhone, Phone,
    PhoneDraft, PhoneId, PhoneType, PHONE_DIGIT_COUNT,
};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use service::contact_service::ContactService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
