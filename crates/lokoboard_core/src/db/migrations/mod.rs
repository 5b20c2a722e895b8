//! Board schema migrations.
//!
//! Steps run in version order inside one transaction; `PRAGMA user_version`
//! records the last applied step. A failing step rolls the whole batch back.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

/// One schema step, identified by its target version.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "init",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    last_version(SCHEMA_STEPS)
}

fn last_version(steps: &[SchemaStep]) -> u32 {
    steps.last().map_or(0, |step| step.version)
}

/// Reads `PRAGMA user_version` from `conn`.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `MigrationFailed` naming the step whose SQL was rejected.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    apply_steps(conn, SCHEMA_STEPS)
}

fn apply_steps(conn: &mut Connection, steps: &[SchemaStep]) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = last_version(steps);
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = steps
        .iter()
        .filter(|step| step.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", step.version))
        .map_err(|source| DbError::MigrationFailed {
            version: step.version,
            name: step.name,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::{apply_steps, schema_version, SchemaStep};
    use crate::db::DbError;
    use rusqlite::Connection;

    const STEPS: &[SchemaStep] = &[
        SchemaStep {
            version: 1,
            name: "lanes",
            sql: "CREATE TABLE lanes (id TEXT PRIMARY KEY, created_at INTEGER NOT NULL);",
        },
        SchemaStep {
            version: 2,
            name: "lane_order",
            sql: "ALTER TABLE lanes ADD COLUMN lane_rank INTEGER NOT NULL DEFAULT 0;
                  UPDATE lanes SET lane_rank = (
                      SELECT COUNT(*) FROM lanes AS earlier
                      WHERE earlier.created_at < lanes.created_at
                  );",
        },
    ];

    #[test]
    fn pending_steps_run_from_stored_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_steps(&mut conn, &STEPS[..1]).unwrap();
        conn.execute_batch(
            "INSERT INTO lanes (id, created_at) VALUES ('b', 2000);
             INSERT INTO lanes (id, created_at) VALUES ('a', 1000);",
        )
        .unwrap();

        apply_steps(&mut conn, STEPS).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), 2);
        let rank_of = |id: &str| -> i64 {
            conn.query_row("SELECT lane_rank FROM lanes WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .unwrap()
        };
        assert_eq!(rank_of("a"), 0);
        assert_eq!(rank_of("b"), 1);

        // Nothing pending: a second run is a no-op.
        apply_steps(&mut conn, STEPS).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 2);
    }

    #[test]
    fn failing_step_is_named_and_rolled_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_steps(&mut conn, &STEPS[..1]).unwrap();
        conn.execute_batch("ALTER TABLE lanes ADD COLUMN lane_rank INTEGER;")
            .unwrap();

        let err = apply_steps(&mut conn, STEPS).unwrap_err();
        assert!(matches!(
            err,
            DbError::MigrationFailed {
                version: 2,
                name: "lane_order",
                ..
            }
        ));
        assert_eq!(schema_version(&conn).unwrap(), 1);
    }
}
