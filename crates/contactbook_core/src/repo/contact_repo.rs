//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-aggregate CRUD over the `contacts` and `phones` tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Insert and update write the contact row and all phone rows in one
//!   immediate transaction; commit is the only success marker.
//! - Update replaces the full phone set (delete-then-insert, no diffing).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::contact::{
    Contact, ContactId, ContactValidationError, NewContact, NewPhone, Phone, PhoneId, PhoneType,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_LIST_SQL: &str = "SELECT
    c.id,
    c.title,
    p.phone_id,
    p.phone,
    p.type
 FROM contacts c
 LEFT JOIN phones p ON p.contact_id = c.id
 ORDER BY c.title COLLATE NOCASE ASC, c.id ASC, p.phone_id ASC;";

const PHONES_BY_CONTACT_SQL: &str = "SELECT
    phone_id,
    phone,
    type
 FROM phones
 WHERE contact_id = ?1
 ORDER BY phone_id ASC;";

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Draft validation failed before any store call.
    Validation(ContactValidationError),
    /// Transport or migration failure from the db layer.
    Db(DbError),
    /// A write targeted a contact id with no matching row.
    NotFound(ContactId),
    /// Persisted state did not parse back into the domain model.
    InvalidData(String),
    /// The connection was never migrated to the expected schema version.
    UninitializedConnection {
        /// Version this binary requires.
        expected_version: u32,
        /// Version found on the connection.
        actual_version: u32,
    },
    /// A required table is missing from the connected database.
    MissingRequiredTable(&'static str),
    /// A required column is missing from the connected database.
    MissingRequiredColumn {
        /// Table the column belongs to.
        table: &'static str,
        /// Missing column name.
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column: {table}.{column}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact aggregate CRUD operations.
pub trait ContactRepository {
    /// Inserts a contact and all of its phones in one transaction.
    fn insert_contact(&mut self, contact: &NewContact) -> RepoResult<ContactId>;
    /// Returns every contact with phones populated, title order,
    /// case-insensitive.
    fn get_all_contacts(&self) -> RepoResult<Vec<Contact>>;
    /// Returns one contact with phones, or `None` when no row matches.
    fn get_contact_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Updates the title and replaces the full phone set in one transaction.
    fn update_contact(&mut self, id: ContactId, contact: &NewContact) -> RepoResult<()>;
    /// Deletes the contact row; cascade removes its phones.
    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections whose schema version or shape does not match what
    /// this binary was built against, so queries never fail half-way through
    /// an operation instead.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn insert_contact(&mut self, contact: &NewContact) -> RepoResult<ContactId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO contacts (title) VALUES (?1);",
            [contact.title.as_str()],
        )?;
        let contact_id = tx.last_insert_rowid();
        insert_phones_in_tx(&tx, contact_id, &contact.phones)?;
        tx.commit()?;
        Ok(contact_id)
    }

    fn get_all_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(CONTACT_LIST_SQL)?;
        let mut rows = stmt.query([])?;
        let mut contacts: Vec<Contact> = Vec::new();

        while let Some(row) = rows.next()? {
            let id: ContactId = row.get("id")?;
            if contacts.last().map(|contact| contact.id) != Some(id) {
                contacts.push(Contact {
                    id,
                    title: row.get("title")?,
                    phones: Vec::new(),
                });
            }
            let phone_id: Option<PhoneId> = row.get("phone_id")?;
            if let (Some(contact), Some(phone_id)) = (contacts.last_mut(), phone_id) {
                contact.phones.push(parse_phone_row(row, id, phone_id)?);
            }
        }

        Ok(contacts)
    }

    fn get_contact_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM contacts WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let title: String = row.get("title")?;
        let phones = load_phones_for_contact(self.conn, id)?;
        Ok(Some(Contact { id, title, phones }))
    }

    fn update_contact(&mut self, id: ContactId, contact: &NewContact) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE contacts SET title = ?2 WHERE id = ?1;",
            params![id, contact.title.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute("DELETE FROM phones WHERE contact_id = ?1;", [id])?;
        insert_phones_in_tx(&tx, id, &contact.phones)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_contact(&mut self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn insert_phones_in_tx(
    tx: &Transaction<'_>,
    contact_id: ContactId,
    phones: &[NewPhone],
) -> RepoResult<()> {
    let mut stmt =
        tx.prepare("INSERT INTO phones (contact_id, phone, type) VALUES (?1, ?2, ?3);")?;
    for phone in phones {
        stmt.execute(params![
            contact_id,
            phone.number.as_str(),
            phone.kind.as_token(),
        ])?;
    }
    Ok(())
}

fn load_phones_for_contact(conn: &Connection, contact_id: ContactId) -> RepoResult<Vec<Phone>> {
    let mut stmt = conn.prepare(PHONES_BY_CONTACT_SQL)?;
    let mut rows = stmt.query([contact_id])?;
    let mut phones = Vec::new();
    while let Some(row) = rows.next()? {
        let phone_id: PhoneId = row.get("phone_id")?;
        phones.push(parse_phone_row(row, contact_id, phone_id)?);
    }
    Ok(phones)
}

fn parse_phone_row(row: &Row<'_>, contact_id: ContactId, phone_id: PhoneId) -> RepoResult<Phone> {
    let kind_text: String = row.get("type")?;
    let kind = PhoneType::parse_token(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid phone type `{kind_text}` in phones.type"))
    })?;
    Ok(Phone {
        id: phone_id,
        contact_id,
        number: row.get("phone")?,
        kind,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["contacts", "phones"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "title"] {
        if !table_has_column(conn, "contacts", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "contacts",
                column,
            });
        }
    }

    for column in ["phone_id", "contact_id", "phone", "type"] {
        if !table_has_column(conn, "phones", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "phones",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
