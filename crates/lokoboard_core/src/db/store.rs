//! Board store handle with explicit open/close lifecycle.
//!
//! Callers open one store, hand `store.conn()` to repositories, and close it
//! when done. Nothing in core keeps a process-wide connection.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    File(PathBuf),
    Memory,
}

/// Owned storage client for one board database.
#[derive(Debug)]
pub struct BoardStore {
    conn: Connection,
    mode: StoreMode,
}

impl BoardStore {
    /// Opens (or creates) a board database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_db(&path)?;
        Ok(Self {
            conn,
            mode: StoreMode::File(path),
        })
    }

    /// Opens a throwaway in-memory board database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            mode: StoreMode::Memory,
        })
    }

    /// Borrowed connection for repository construction.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn mode(&self) -> &StoreMode {
        &self.mode
    }

    /// Closes the underlying connection, flushing pending state.
    ///
    /// # Errors
    /// - Returns the SQLite error when the connection refuses to close
    ///   (e.g. an unfinalized statement is still alive).
    pub fn close(self) -> DbResult<()> {
        let mode = match &self.mode {
            StoreMode::File(_) => "file",
            StoreMode::Memory => "memory",
        };
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok mode={mode}");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=db_close module=db status=error mode={mode} error={err}");
                Err(DbError::Sqlite(err))
            }
        }
    }
}
