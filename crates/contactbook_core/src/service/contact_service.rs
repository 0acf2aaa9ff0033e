//! Contact use-case service.
//!
//! # Responsibility
//! - Provide stable save/list/get/update/delete entry points for core
//!   callers.
//! - Validate UI drafts and delegate persistence to the repository.
//!
//! # Invariants
//! - A draft that fails validation never reaches the repository; the save is
//!   aborted with no store mutation attempted.
//! - Service layer remains storage-agnostic.

use crate::model::contact::{Contact, ContactDraft, ContactId};
use crate::repo::contact_repo::{ContactRepository, RepoResult};
use log::info;

/// Use-case service wrapper for contact CRUD operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates a draft and persists it as a new contact.
    ///
    /// # Contract
    /// - Returns `RepoError::Validation` without touching the store when the
    ///   draft is invalid.
    /// - Returns the store-assigned contact id on success.
    pub fn save_contact(&mut self, draft: &ContactDraft) -> RepoResult<ContactId> {
        let contact = draft.validate()?;
        let id = self.repo.insert_contact(&contact)?;
        info!(
            "event=contact_save module=service status=ok contact_id={id} phones={}",
            contact.phones.len()
        );
        Ok(id)
    }

    /// Lists every contact, title order, case-insensitive.
    pub fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        self.repo.get_all_contacts()
    }

    /// Gets one contact by id; absent ids are `Ok(None)`, not an error.
    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get_contact_by_id(id)
    }

    /// Validates a draft and replaces an existing contact with it.
    ///
    /// The stored phone set is replaced in full; callers editing a contact
    /// resubmit every phone, not a delta.
    pub fn update_contact(&mut self, id: ContactId, draft: &ContactDraft) -> RepoResult<()> {
        let contact = draft.validate()?;
        self.repo.update_contact(id, &contact)?;
        info!(
            "event=contact_update module=service status=ok contact_id={id} phones={}",
            contact.phones.len()
        );
        Ok(())
    }

    /// Deletes a contact; its phones go with it via cascade.
    pub fn delete_contact(&mut self, id: ContactId) -> RepoResult<()> {
        self.repo.delete_contact(id)?;
        info!("event=contact_delete module=service status=ok contact_id={id}");
        Ok(())
    }
}
