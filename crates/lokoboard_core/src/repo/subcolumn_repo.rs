//! Subcolumn repository contract and SQLite implementation.
//!
//! # Invariants
//! - A subcolumn never changes its owning column.
//! - Listing within one column follows insertion order.
//! - Card lookups for one subcolumn go through the `(column_id, sub_id)`
//!   index, never a full scan of `cards`.

use super::board_repo::{CascadeReport, RepoError, RepoResult, SqliteBoardRepository};
use super::column_repo::column_exists;
use crate::model::subcolumn::{Subcolumn, SubcolumnId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SUBCOLUMN_SELECT_SQL: &str = "SELECT
    sub_id,
    column_id,
    title
FROM subcolumns";

/// Repository interface for subcolumn operations.
pub trait SubcolumnRepository {
    /// Creates one subcolumn inside an existing column.
    fn create_subcolumn(&self, column_id: &str, title: &str) -> RepoResult<Subcolumn>;
    /// Creates one subcolumn and moves the column's direct cards into it.
    ///
    /// Returns the new subcolumn and the number of adopted cards.
    fn create_subcolumn_adopting(
        &self,
        column_id: &str,
        title: &str,
    ) -> RepoResult<(Subcolumn, usize)>;
    /// Loads one subcolumn by id.
    fn get_subcolumn(&self, sub_id: &str) -> RepoResult<Option<Subcolumn>>;
    /// Lists subcolumns owned by one column.
    fn list_subcolumns(&self, column_id: &str) -> RepoResult<Vec<Subcolumn>>;
    /// Deletes one subcolumn and every card referencing it.
    fn delete_subcolumn_cascade(&self, sub_id: &str) -> RepoResult<CascadeReport>;
    /// Deletes one subcolumn after moving its cards back to the column.
    fn delete_subcolumn_release(&self, sub_id: &str) -> RepoResult<CascadeReport>;
}

impl SubcolumnRepository for SqliteBoardRepository<'_> {
    fn create_subcolumn(&self, column_id: &str, title: &str) -> RepoResult<Subcolumn> {
        if !column_exists(self.conn, column_id)? {
            return Err(RepoError::ColumnNotFound(column_id.to_string()));
        }
        let sub_id = Subcolumn::generate_id();
        insert_subcolumn(self.conn, &sub_id, column_id, title)?;
        load_required_subcolumn(self.conn, &sub_id)
    }

    fn create_subcolumn_adopting(
        &self,
        column_id: &str,
        title: &str,
    ) -> RepoResult<(Subcolumn, usize)> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !column_exists(&tx, column_id)? {
            return Err(RepoError::ColumnNotFound(column_id.to_string()));
        }

        let sub_id = Subcolumn::generate_id();
        insert_subcolumn(&tx, &sub_id, column_id, title)?;
        let adopted = tx.execute(
            "UPDATE cards
             SET sub_id = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE column_id = ?1
               AND sub_id IS NULL;",
            params![column_id, sub_id],
        )?;
        let subcolumn = load_required_subcolumn(&tx, &sub_id)?;

        tx.commit()?;
        Ok((subcolumn, adopted))
    }

    fn get_subcolumn(&self, sub_id: &str) -> RepoResult<Option<Subcolumn>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBCOLUMN_SELECT_SQL} WHERE sub_id = ?1;"))?;
        let mut rows = stmt.query([sub_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_subcolumn_row(row)?));
        }
        Ok(None)
    }

    fn list_subcolumns(&self, column_id: &str) -> RepoResult<Vec<Subcolumn>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUBCOLUMN_SELECT_SQL}
             WHERE column_id = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([column_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_subcolumn_row(row)?);
        }
        Ok(items)
    }

    fn delete_subcolumn_cascade(&self, sub_id: &str) -> RepoResult<CascadeReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let column_id = owning_column_id(&tx, sub_id)?;

        let cards_removed = tx.execute(
            "DELETE FROM cards WHERE column_id = ?1 AND sub_id = ?2;",
            params![column_id, sub_id],
        )?;
        let subcolumns_removed = tx.execute("DELETE FROM subcolumns WHERE sub_id = ?1;", [sub_id])?;

        tx.commit()?;
        Ok(CascadeReport {
            subcolumns_removed,
            cards_removed,
            cards_released: 0,
        })
    }

    fn delete_subcolumn_release(&self, sub_id: &str) -> RepoResult<CascadeReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let column_id = owning_column_id(&tx, sub_id)?;

        let cards_released = tx.execute(
            "UPDATE cards
             SET sub_id = NULL,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE column_id = ?1
               AND sub_id = ?2;",
            params![column_id, sub_id],
        )?;
        let subcolumns_removed = tx.execute("DELETE FROM subcolumns WHERE sub_id = ?1;", [sub_id])?;

        tx.commit()?;
        Ok(CascadeReport {
            subcolumns_removed,
            cards_removed: 0,
            cards_released,
        })
    }
}

/// Lists subcolumn ids owned by one column via the `by_column` index.
pub(crate) fn list_sub_ids_by_column(
    conn: &Connection,
    column_id: &str,
) -> RepoResult<Vec<SubcolumnId>> {
    let mut stmt = conn.prepare("SELECT sub_id FROM subcolumns WHERE column_id = ?1;")?;
    let mut rows = stmt.query([column_id])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

fn owning_column_id(conn: &Connection, sub_id: &str) -> RepoResult<String> {
    conn.query_row(
        "SELECT column_id FROM subcolumns WHERE sub_id = ?1;",
        [sub_id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| RepoError::SubcolumnNotFound(sub_id.to_string()))
}

fn insert_subcolumn(conn: &Connection, sub_id: &str, column_id: &str, title: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO subcolumns (sub_id, column_id, title) VALUES (?1, ?2, ?3);",
        params![sub_id, column_id, title],
    )?;
    Ok(())
}

fn load_required_subcolumn(conn: &Connection, sub_id: &str) -> RepoResult<Subcolumn> {
    let mut stmt = conn.prepare(&format!("{SUBCOLUMN_SELECT_SQL} WHERE sub_id = ?1;"))?;
    let mut rows = stmt.query([sub_id])?;
    if let Some(row) = rows.next()? {
        return parse_subcolumn_row(row);
    }
    Err(RepoError::SubcolumnNotFound(sub_id.to_string()))
}

fn parse_subcolumn_row(row: &Row<'_>) -> RepoResult<Subcolumn> {
    Ok(Subcolumn {
        sub_id: row.get("sub_id")?,
        column_id: row.get("column_id")?,
        title: row.get("title")?,
    })
}
