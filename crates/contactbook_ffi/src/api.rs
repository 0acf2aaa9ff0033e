//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to the mobile UI via FRB.
//! - Keep error semantics simple for the screen layer: envelope responses
//!   with `ok` + message, no exceptions across the boundary.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Store connections are opened per call and dropped on every exit path.
//! - The mask engine state travels through the call arguments; the widget
//!   hands `reformatting` back on its next call.

use contactbook_core::db::open_db;
use contactbook_core::{
    advance, core_version as core_version_inner, format_display,
    init_logging as init_logging_inner, ping as ping_inner, Contact, ContactDraft,
    ContactService, MaskState, PhoneDraft, PhoneType, SqliteContactRepository,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "contactbook.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same config (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One phone row as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneView {
    /// Store-assigned phone id.
    pub id: i64,
    /// Canonical digit string.
    pub number: String,
    /// Masked form for list display.
    pub display: String,
    /// Category token (`personal|business|residential`).
    pub kind: String,
}

/// One contact as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactView {
    /// Store-assigned contact id.
    pub id: i64,
    /// Display name.
    pub title: String,
    /// Phones in insertion order.
    pub phones: Vec<PhoneView>,
}

/// One phone entry as collected by the edit screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneInput {
    /// Raw entry text; may still carry mask punctuation.
    pub number: String,
    /// Category token, or `None` while the picker sits on its placeholder.
    pub kind: Option<String>,
}

/// Response envelope for the contact list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    /// Whether the read succeeded.
    pub ok: bool,
    /// Contacts in display order (title, case-insensitive).
    pub contacts: Vec<ContactView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Response envelope for a single-contact read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactGetResponse {
    /// Whether the read succeeded. An absent contact is still `ok=true`.
    pub ok: bool,
    /// The contact, or `None` when no row matches.
    pub contact: Option<ContactView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for save/update/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected contact id on success.
    pub contact_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: i64) -> Self {
        Self {
            ok: true,
            contact_id: Some(contact_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Mask engine outcome handed back to the entry widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskEditResponse {
    /// Buffer the widget should display.
    pub buffer: String,
    /// Caret position in characters, at the end of `buffer`.
    pub caret: u32,
    /// Whether the most recent edit was refused for exceeding 11 digits.
    pub rejected: bool,
    /// Pass `true` back on the next call when the widget applies `buffer`
    /// programmatically; that echo must not be processed as a user edit.
    pub reformatting: bool,
}

/// Lists every contact for the main screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns an empty list plus message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    match with_contact_service(|service| service.list_contacts()) {
        Ok(contacts) => {
            let contacts: Vec<ContactView> = contacts.into_iter().map(to_contact_view).collect();
            let message = format!("Loaded {} contact(s).", contacts.len());
            ContactListResponse {
                ok: true,
                contacts,
                message,
            }
        }
        Err(err) => {
            warn!("event=ffi_contacts_list module=ffi status=error error={err}");
            ContactListResponse {
                ok: false,
                contacts: Vec::new(),
                message: format!("contacts_list failed: {err}"),
            }
        }
    }
}

/// Loads one contact for the edit screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - An id with no matching row returns `ok=true, contact=None`; the edit
///   flow treats that as a normal branch and closes.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_get(id: i64) -> ContactGetResponse {
    match with_contact_service(|service| service.get_contact(id)) {
        Ok(Some(contact)) => ContactGetResponse {
            ok: true,
            contact: Some(to_contact_view(contact)),
            message: "Contact loaded.".to_string(),
        },
        Ok(None) => ContactGetResponse {
            ok: true,
            contact: None,
            message: "Contact not found.".to_string(),
        },
        Err(err) => {
            warn!("event=ffi_contact_get module=ffi status=error contact_id={id} error={err}");
            ContactGetResponse {
                ok: false,
                contact: None,
                message: format!("contact_get failed: {err}"),
            }
        }
    }
}

/// Saves a new contact aggregate from the add screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Validation failures come back as `ok=false` with the reason; nothing is
///   written in that case.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_save(title: String, phones: Vec<PhoneInput>) -> ContactActionResponse {
    let draft = to_contact_draft(title, phones);
    match with_contact_service(|service| service.save_contact(&draft)) {
        Ok(id) => ContactActionResponse::success("Contact saved.", id),
        Err(err) => ContactActionResponse::failure(format!("contact_save failed: {err}")),
    }
}

/// Replaces an existing contact aggregate from the edit screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - The stored phone set is replaced in full by the submitted entries.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_update(id: i64, title: String, phones: Vec<PhoneInput>) -> ContactActionResponse {
    let draft = to_contact_draft(title, phones);
    match with_contact_service(|service| service.update_contact(id, &draft).map(|()| id)) {
        Ok(id) => ContactActionResponse::success("Contact updated.", id),
        Err(err) => ContactActionResponse::failure(format!("contact_update failed: {err}")),
    }
}

/// Deletes a contact and, via cascade, all of its phones.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(id: i64) -> ContactActionResponse {
    match with_contact_service(|service| service.delete_contact(id).map(|()| id)) {
        Ok(id) => ContactActionResponse::success("Contact deleted.", id),
        Err(err) => ContactActionResponse::failure(format!("contact_delete failed: {err}")),
    }
}

/// Runs one mask engine pass for the phone entry widget.
///
/// # FFI contract
/// - Sync call, pure computation, no DB access.
/// - Never panics.
/// - The widget passes `reformatting=true` when reporting the programmatic
///   replacement it applied from the previous response.
#[flutter_rust_bridge::frb(sync)]
pub fn phone_mask_edit(buffer: String, reformatting: bool) -> MaskEditResponse {
    let state = if reformatting {
        MaskState::Reformatting
    } else {
        MaskState::Idle
    };
    let outcome = advance(state, &buffer);
    MaskEditResponse {
        buffer: outcome.buffer,
        caret: outcome.caret as u32,
        rejected: outcome.rejected,
        reformatting: outcome.state == MaskState::Reformatting,
    }
}

/// Formats a stored number for list display.
///
/// # FFI contract
/// - Sync call, pure computation, no DB access.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn phone_format_display(number: String) -> String {
    format_display(&number)
}

/// Returns the schema version of the on-device database, or 0 when the
/// database cannot be opened.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; diagnostic only.
#[flutter_rust_bridge::frb(sync)]
pub fn db_schema_version() -> i64 {
    let db_path = resolve_db_path();
    match open_db(&db_path) {
        Ok(conn) => conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap_or(0),
        Err(err) => {
            warn!("event=ffi_db_schema_version module=ffi status=error error={err}");
            0
        }
    }
}

fn to_contact_view(contact: Contact) -> ContactView {
    ContactView {
        id: contact.id,
        title: contact.title,
        phones: contact
            .phones
            .into_iter()
            .map(|phone| PhoneView {
                id: phone.id,
                display: format_display(&phone.number),
                number: phone.number,
                kind: phone.kind.as_token().to_string(),
            })
            .collect(),
    }
}

fn to_contact_draft(title: String, phones: Vec<PhoneInput>) -> ContactDraft {
    ContactDraft {
        title,
        phones: phones
            .into_iter()
            .map(|input| PhoneDraft {
                number: input.number,
                // Unknown tokens fold into "not selected" and fail validation
                // rather than guessing a category.
                kind: input
                    .kind
                    .as_deref()
                    .and_then(|token| PhoneType::parse_token(&token.to_ascii_lowercase())),
            })
            .collect(),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("CONTACTBOOK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_contact_service<T>(
    f: impl FnOnce(&mut ContactService<SqliteContactRepository<'_>>) -> contactbook_core::RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let mut conn: rusqlite::Connection =
        open_db(&db_path).map_err(|err| format!("contact DB open failed: {err}"))?;
    let repo = SqliteContactRepository::try_new(&mut conn)
        .map_err(|err| format!("contact repo init failed: {err}"))?;
    let mut service = ContactService::new(repo);
    f(&mut service).map_err(|err| err.to_string())
}
