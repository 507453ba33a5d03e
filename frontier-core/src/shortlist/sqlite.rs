//! SQLite-backed shortlist persistence.
//!
//! Each shortlist is one row of `shortlist_documents`, keyed by document name
//! and holding the JSON membership object.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use super::{Membership, ShortlistBackend, ShortlistError};

/// Document name used when none is configured.
pub const DEFAULT_SHORTLIST_DOCUMENT: &str = "top100List";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS shortlist_documents (
    name TEXT PRIMARY KEY,
    members TEXT NOT NULL
)";

/// Error raised when reading or writing the SQLite shortlist.
#[derive(Debug, Error)]
pub enum SqliteShortlistError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The stored membership was not a JSON object.
    #[error("shortlist document {document} is not valid JSON: {source}")]
    InvalidDocument {
        /// Name of the offending document.
        document: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Generic SQLite error.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Shortlist backend storing one membership document in SQLite.
#[derive(Debug)]
pub struct SqliteShortlistBackend {
    connection: Connection,
    document: String,
}

impl SqliteShortlistBackend {
    /// Open (creating if needed) the database at `path`.
    ///
    /// The schema and an empty document are created when missing.
    pub fn open<P: AsRef<Path>>(
        path: P,
        document: impl Into<String>,
    ) -> Result<Self, SqliteShortlistError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteShortlistError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::initialise(connection, document.into())
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(document: impl Into<String>) -> Result<Self, SqliteShortlistError> {
        Self::initialise(Connection::open_in_memory()?, document.into())
    }

    fn initialise(connection: Connection, document: String) -> Result<Self, SqliteShortlistError> {
        connection.execute(SCHEMA, [])?;
        connection.execute(
            "INSERT OR IGNORE INTO shortlist_documents (name, members) VALUES (?1, '{}')",
            params![document],
        )?;
        Ok(Self {
            connection,
            document,
        })
    }

    /// Name of the document this backend reads and writes.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    fn read(&self) -> Result<Membership, SqliteShortlistError> {
        let stored: Option<String> = self
            .connection
            .query_row(
                "SELECT members FROM shortlist_documents WHERE name = ?1",
                params![self.document],
                |row| row.get(0),
            )
            .optional()?;
        let Some(stored) = stored else {
            return Ok(Membership::new());
        };
        Membership::from_document(&stored).map_err(|source| SqliteShortlistError::InvalidDocument {
            document: self.document.clone(),
            source,
        })
    }

    fn write(&self, membership: &Membership) -> Result<(), SqliteShortlistError> {
        self.connection.execute(
            "INSERT INTO shortlist_documents (name, members) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET members = excluded.members",
            params![self.document, membership.to_document()],
        )?;
        Ok(())
    }
}

impl ShortlistBackend for SqliteShortlistBackend {
    fn load(&self) -> Result<Membership, ShortlistError> {
        self.read().map_err(|err| ShortlistError::backend("load", err))
    }

    fn store(&self, membership: &Membership) -> Result<(), ShortlistError> {
        self.write(membership)
            .map_err(|err| ShortlistError::backend("store", err))
    }
}
