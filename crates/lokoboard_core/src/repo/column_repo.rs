//! Column repository contract and SQLite implementation.
//!
//! # Invariants
//! - Column listing is deterministic: `sort_order ASC, column_id ASC`.
//! - New columns are appended after the current last column.
//! - Deleting a column removes its subcolumns and every card it owns, directly
//!   or through a subcolumn, in one transaction.

use super::board_repo::{CascadeReport, RepoError, RepoResult, SqliteBoardRepository};
use super::subcolumn_repo::list_sub_ids_by_column;
use crate::model::column::{Column, ColumnId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const COLUMN_SELECT_SQL: &str = "SELECT
    column_id,
    title,
    sort_order
FROM columns";

/// Repository interface for column operations.
pub trait ColumnRepository {
    /// Creates one column at the end of the board.
    fn create_column(&self, title: &str) -> RepoResult<Column>;
    /// Loads one column by id.
    fn get_column(&self, column_id: &str) -> RepoResult<Option<Column>>;
    /// Lists all columns in board order.
    fn list_columns(&self) -> RepoResult<Vec<Column>>;
    /// Deletes one column together with its subcolumns and cards.
    fn delete_column_cascade(&self, column_id: &str) -> RepoResult<CascadeReport>;
    /// Writes `sort_order = index` for every id in sequence.
    fn reorder_columns(&self, ordered_ids: &[ColumnId]) -> RepoResult<()>;
}

impl ColumnRepository for SqliteBoardRepository<'_> {
    fn create_column(&self, title: &str) -> RepoResult<Column> {
        let column_id = Column::generate_id();
        let sort_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM columns;",
            [],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO columns (column_id, title, sort_order) VALUES (?1, ?2, ?3);",
            params![column_id, title, sort_order],
        )?;
        load_required_column(self.conn, &column_id)
    }

    fn get_column(&self, column_id: &str) -> RepoResult<Option<Column>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COLUMN_SELECT_SQL} WHERE column_id = ?1;"))?;
        let mut rows = stmt.query([column_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_column_row(row)?));
        }
        Ok(None)
    }

    fn list_columns(&self) -> RepoResult<Vec<Column>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLUMN_SELECT_SQL} ORDER BY sort_order ASC, column_id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(parse_column_row(row)?);
        }
        Ok(columns)
    }

    fn delete_column_cascade(&self, column_id: &str) -> RepoResult<CascadeReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !column_exists(&tx, column_id)? {
            return Err(RepoError::ColumnNotFound(column_id.to_string()));
        }

        let mut report = CascadeReport::default();
        let sub_ids = list_sub_ids_by_column(&tx, column_id)?;
        for sub_id in &sub_ids {
            report.cards_removed += tx.execute(
                "DELETE FROM cards WHERE column_id = ?1 AND sub_id = ?2;",
                params![column_id, sub_id],
            )?;
        }
        report.cards_removed += tx.execute(
            "DELETE FROM cards WHERE column_id = ?1 AND sub_id IS NULL;",
            [column_id],
        )?;

        for sub_id in &sub_ids {
            report.subcolumns_removed +=
                tx.execute("DELETE FROM subcolumns WHERE sub_id = ?1;", [sub_id])?;
        }
        tx.execute("DELETE FROM columns WHERE column_id = ?1;", [column_id])?;

        tx.commit()?;
        Ok(report)
    }

    fn reorder_columns(&self, ordered_ids: &[ColumnId]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (index, column_id) in ordered_ids.iter().enumerate() {
            let changed = tx.execute(
                "UPDATE columns SET sort_order = ?2 WHERE column_id = ?1;",
                params![column_id, index as i64],
            )?;
            if changed == 0 {
                return Err(RepoError::ColumnNotFound(column_id.clone()));
            }
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn column_exists(conn: &Connection, column_id: &str) -> RepoResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM columns WHERE column_id = ?1;",
            [column_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn load_required_column(conn: &Connection, column_id: &str) -> RepoResult<Column> {
    let mut stmt = conn.prepare(&format!("{COLUMN_SELECT_SQL} WHERE column_id = ?1;"))?;
    let mut rows = stmt.query([column_id])?;
    if let Some(row) = rows.next()? {
        return parse_column_row(row);
    }
    Err(RepoError::ColumnNotFound(column_id.to_string()))
}

fn parse_column_row(row: &Row<'_>) -> RepoResult<Column> {
    Ok(Column {
        column_id: row.get("column_id")?,
        title: row.get("title")?,
        order: row.get("sort_order")?,
    })
}
