//! Connection setup for board databases.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, which the composite
//!   card -> subcolumn reference relies on.
//! - Returned connections carry the latest schema.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a writer waits for a competing `BEGIN IMMEDIATE` to finish.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens (creating if needed) a board database file, ready for use.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(Target::File(path.as_ref()))
}

/// Opens a private in-memory board database, ready for use.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_target(Target::Memory)
}

fn open_target(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.label();

    let result = target
        .connect()
        .map_err(DbError::from)
        .and_then(|mut conn| prepare(&mut conn).map(|()| conn));
    let elapsed_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    result
}

fn prepare(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
