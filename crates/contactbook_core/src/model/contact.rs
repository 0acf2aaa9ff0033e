//! Contact aggregate model and draft validation.
//!
//! # Responsibility
//! - Define `Contact` and `Phone` as one aggregate created, updated and
//!   deleted together.
//! - Validate UI drafts before they are handed to the persistence layer.
//!
//! # Invariants
//! - `Phone::number` is the canonical unmasked digit string.
//! - A valid phone number has exactly [`PHONE_DIGIT_COUNT`] digits.
//! - Drafts carry `Option<PhoneType>`; `None` means the user never picked a
//!   type and is rejected at validation time.

use crate::mask::strip_non_digits;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable store-assigned identifier for a contact row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ContactId = i64;

/// Stable store-assigned identifier for a phone row.
pub type PhoneId = i64;

/// Number of digits a valid phone number must have.
pub const PHONE_DIGIT_COUNT: usize = 11;

/// Closed set of phone categories.
///
/// There is no "unselected" member. Drafts carry `Option<PhoneType>` instead,
/// so a missing selection can never collide with a renamed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneType {
    /// Personal number.
    Personal,
    /// Work/business number.
    Business,
    /// Landline at home.
    Residential,
}

impl PhoneType {
    /// Returns the stable lowercase token stored in the `phones.type` column.
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Business => "business",
            Self::Residential => "residential",
        }
    }

    /// Parses a stored or wire token back into a category.
    ///
    /// Returns `None` for unknown tokens; callers decide whether that is
    /// invalid persisted data or an unselected draft.
    pub fn parse_token(value: &str) -> Option<Self> {
        match value {
            "personal" => Some(Self::Personal),
            "business" => Some(Self::Business),
            "residential" => Some(Self::Residential),
            _ => None,
        }
    }
}

/// Persisted phone row belonging to exactly one contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Store-assigned row id.
    pub id: PhoneId,
    /// Owning contact id (foreign key, cascade on delete).
    pub contact_id: ContactId,
    /// Canonical digit string, no mask punctuation.
    pub number: String,
    /// Serialized as `type` to match the on-disk column naming.
    #[serde(rename = "type")]
    pub kind: PhoneType,
}

/// Persisted contact with its full phone set.
///
/// The phone list reflects the most recent successful write in full; updates
/// replace the whole set rather than merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned row id, never zero for a persisted contact.
    pub id: ContactId,
    /// Free-text display name.
    pub title: String,
    /// Phones in insertion order.
    pub phones: Vec<Phone>,
}

/// One phone entry as collected by the UI, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDraft {
    /// Raw entry text; may still contain mask punctuation.
    pub number: String,
    /// Selected category, or `None` while the picker sits on its placeholder.
    pub kind: Option<PhoneType>,
}

/// A whole contact as collected by the UI, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    /// Display name as typed.
    pub title: String,
    /// Phone entries as typed.
    pub phones: Vec<PhoneDraft>,
}

/// Validated phone ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhone {
    /// Exactly [`PHONE_DIGIT_COUNT`] digits.
    pub number: String,
    /// Concrete category.
    pub kind: PhoneType,
}

/// Validated contact aggregate ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    /// Non-blank, trimmed display name.
    pub title: String,
    /// At least one validated phone.
    pub phones: Vec<NewPhone>,
}

/// Why a draft was refused before any store mutation was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Title was empty or whitespace only.
    BlankTitle,
    /// Draft carried no phone entries at all.
    NoPhones,
    /// A phone entry did not have exactly [`PHONE_DIGIT_COUNT`] digits.
    InvalidDigitCount {
        /// Position of the offending entry in the draft.
        index: usize,
        /// Digit count actually present after unmasking.
        digits: usize,
    },
    /// A phone entry was left without a selected category.
    TypeNotSelected {
        /// Position of the offending entry in the draft.
        index: usize,
    },
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "contact title cannot be blank"),
            Self::NoPhones => write!(f, "contact needs at least one phone number"),
            Self::InvalidDigitCount { index, digits } => write!(
                f,
                "phone entry {index} must have exactly {PHONE_DIGIT_COUNT} digits, got {digits}"
            ),
            Self::TypeNotSelected { index } => {
                write!(f, "phone entry {index} has no type selected")
            }
        }
    }
}

impl Error for ContactValidationError {}

impl ContactDraft {
    /// Validates this draft into a persistable aggregate.
    ///
    /// # Contract
    /// - Trims the title; blank titles are rejected.
    /// - Strips mask punctuation from every number before counting digits.
    /// - Requires a concrete category on every entry.
    /// - Fails on the first offending entry; nothing is partially accepted.
    pub fn validate(&self) -> Result<NewContact, ContactValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ContactValidationError::BlankTitle);
        }
        if self.phones.is_empty() {
            return Err(ContactValidationError::NoPhones);
        }

        let mut phones = Vec::with_capacity(self.phones.len());
        for (index, draft) in self.phones.iter().enumerate() {
            let number = strip_non_digits(&draft.number);
            if number.len() != PHONE_DIGIT_COUNT {
                return Err(ContactValidationError::InvalidDigitCount {
                    index,
                    digits: number.len(),
                });
            }
            let Some(kind) = draft.kind else {
                return Err(ContactValidationError::TypeNotSelected { index });
            };
            phones.push(NewPhone { number, kind });
        }

        Ok(NewContact {
            title: title.to_string(),
            phones,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactDraft, ContactValidationError, PhoneDraft, PhoneType};

    fn draft(title: &str, phones: &[(&str, Option<PhoneType>)]) -> ContactDraft {
        ContactDraft {
            title: title.to_string(),
            phones: phones
                .iter()
                .map(|(number, kind)| PhoneDraft {
                    number: (*number).to_string(),
                    kind: *kind,
                })
                .collect(),
        }
    }

    #[test]
    fn valid_draft_produces_canonical_digits() {
        let validated = draft("Jane", &[("(11) 99999-8888", Some(PhoneType::Personal))])
            .validate()
            .unwrap();
        assert_eq!(validated.title, "Jane");
        assert_eq!(validated.phones.len(), 1);
        assert_eq!(validated.phones[0].number, "11999998888");
        assert_eq!(validated.phones[0].kind, PhoneType::Personal);
    }

    #[test]
    fn title_is_trimmed() {
        let validated = draft("  Jane  ", &[("11999998888", Some(PhoneType::Business))])
            .validate()
            .unwrap();
        assert_eq!(validated.title, "Jane");
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = draft("   ", &[("11999998888", Some(PhoneType::Personal))])
            .validate()
            .unwrap_err();
        assert_eq!(err, ContactValidationError::BlankTitle);
    }

    #[test]
    fn empty_phone_list_is_rejected() {
        let err = draft("Jane", &[]).validate().unwrap_err();
        assert_eq!(err, ContactValidationError::NoPhones);
    }

    #[test]
    fn short_number_is_rejected_with_position() {
        let err = draft(
            "Jane",
            &[
                ("11999998888", Some(PhoneType::Personal)),
                ("119999", Some(PhoneType::Business)),
            ],
        )
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            ContactValidationError::InvalidDigitCount {
                index: 1,
                digits: 6
            }
        );
    }

    #[test]
    fn unselected_type_is_rejected() {
        let err = draft("Jane", &[("11999998888", None)]).validate().unwrap_err();
        assert_eq!(err, ContactValidationError::TypeNotSelected { index: 0 });
    }

    #[test]
    fn token_roundtrip_covers_all_categories() {
        for kind in [
            PhoneType::Personal,
            PhoneType::Business,
            PhoneType::Residential,
        ] {
            assert_eq!(PhoneType::parse_token(kind.as_token()), Some(kind));
        }
        assert_eq!(PhoneType::parse_token("mobile"), None);
        assert_eq!(PhoneType::parse_token("Personal"), None);
    }
}
