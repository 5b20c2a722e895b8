//! Shared repository plumbing: errors, the SQLite handle, and schema checks.
//!
//! # Responsibility
//! - Provide one SQLite-backed repository implementing every collection trait.
//! - Refuse connections that are not migrated to the expected schema.
//!
//! # Invariants
//! - A constructed `SqliteBoardRepository` always points at a fully migrated
//!   schema with the `columns`, `subcolumns` and `cards` tables present.

use super::{CardRepository, ColumnRepository, SubcolumnRepository};
use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::card::{CardId, CardValidationError};
use crate::model::column::ColumnId;
use crate::model::subcolumn::SubcolumnId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by board repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from board repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Card failed validation before a write.
    Validation(CardValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    ColumnNotFound(ColumnId),
    SubcolumnNotFound(SubcolumnId),
    CardNotFound(CardId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::SubcolumnNotFound(id) => write!(f, "subcolumn not found: {id}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "board repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "board repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "board repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
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

impl From<CardValidationError> for RepoError {
    fn from(value: CardValidationError) -> Self {
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

/// Counts of records touched by a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub subcolumns_removed: usize,
    pub cards_removed: usize,
    /// Cards moved back to their column instead of being removed.
    pub cards_released: usize,
}

/// Full storage contract consumed by the hierarchy service.
pub trait BoardRepository: ColumnRepository + SubcolumnRepository + CardRepository {}

impl<T> BoardRepository for T where T: ColumnRepository + SubcolumnRepository + CardRepository {}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_board_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("columns", &["column_id", "title", "sort_order", "created_at"]),
    ("subcolumns", &["sub_id", "column_id", "title", "created_at"]),
    (
        "cards",
        &[
            "id",
            "type",
            "name",
            "code",
            "position",
            "photo_url",
            "column_id",
            "sub_id",
            "updated_at",
        ],
    ),
];

fn ensure_board_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
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
