//! Card repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Card::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Container listing uses the `(column_id, sub_id)` index.

use super::board_repo::{RepoError, RepoResult, SqliteBoardRepository};
use crate::model::card::{Card, CardType};
use rusqlite::{params, Row};

const CARD_SELECT_SQL: &str = "SELECT
    id,
    type,
    name,
    code,
    position,
    photo_url,
    column_id,
    sub_id
FROM cards";

/// Repository interface for card operations.
pub trait CardRepository {
    fn create_card(&self, card: &Card) -> RepoResult<()>;
    fn get_card(&self, card_id: &str) -> RepoResult<Option<Card>>;
    /// Overwrites every stored field of an existing card.
    fn update_card(&self, card: &Card) -> RepoResult<()>;
    fn delete_card(&self, card_id: &str) -> RepoResult<()>;
    /// Repoints a card to another column and optional subcolumn.
    fn move_card(&self, card_id: &str, column_id: &str, sub_id: Option<&str>) -> RepoResult<()>;
    /// Lists cards of one container; `sub_id = None` means direct column cards.
    fn list_cards(&self, column_id: &str, sub_id: Option<&str>) -> RepoResult<Vec<Card>>;
    /// Lists every card on the board.
    fn list_all_cards(&self) -> RepoResult<Vec<Card>>;
}

impl CardRepository for SqliteBoardRepository<'_> {
    fn create_card(&self, card: &Card) -> RepoResult<()> {
        card.validate()?;

        self.conn.execute(
            "INSERT INTO cards (
                id,
                type,
                name,
                code,
                position,
                photo_url,
                column_id,
                sub_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                card.id,
                card.kind.as_str(),
                card.name,
                card.code,
                card.position,
                card.photo_url,
                card.column_id,
                card.sub_id,
            ],
        )?;
        Ok(())
    }

    fn get_card(&self, card_id: &str) -> RepoResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([card_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_card_row(row)?));
        }
        Ok(None)
    }

    fn update_card(&self, card: &Card) -> RepoResult<()> {
        card.validate()?;

        let changed = self.conn.execute(
            "UPDATE cards
             SET
                type = ?2,
                name = ?3,
                code = ?4,
                position = ?5,
                photo_url = ?6,
                column_id = ?7,
                sub_id = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                card.id,
                card.kind.as_str(),
                card.name,
                card.code,
                card.position,
                card.photo_url,
                card.column_id,
                card.sub_id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(card.id.clone()));
        }
        Ok(())
    }

    fn delete_card(&self, card_id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM cards WHERE id = ?1;", [card_id])?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(card_id.to_string()));
        }
        Ok(())
    }

    fn move_card(&self, card_id: &str, column_id: &str, sub_id: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE cards
             SET
                column_id = ?2,
                sub_id = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![card_id, column_id, sub_id],
        )?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(card_id.to_string()));
        }
        Ok(())
    }

    fn list_cards(&self, column_id: &str, sub_id: Option<&str>) -> RepoResult<Vec<Card>> {
        let mut cards = Vec::new();
        match sub_id {
            Some(sub_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{CARD_SELECT_SQL}
                     WHERE column_id = ?1
                       AND sub_id = ?2
                     ORDER BY created_at ASC, rowid ASC;"
                ))?;
                let mut rows = stmt.query(params![column_id, sub_id])?;
                while let Some(row) = rows.next()? {
                    cards.push(parse_card_row(row)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{CARD_SELECT_SQL}
                     WHERE column_id = ?1
                       AND sub_id IS NULL
                     ORDER BY created_at ASC, rowid ASC;"
                ))?;
                let mut rows = stmt.query([column_id])?;
                while let Some(row) = rows.next()? {
                    cards.push(parse_card_row(row)?);
                }
            }
        }
        Ok(cards)
    }

    fn list_all_cards(&self) -> RepoResult<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }
        Ok(cards)
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    let type_text: String = row.get("type")?;
    let kind = CardType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid card type `{type_text}` in cards.type"))
    })?;

    let card = Card {
        id: row.get("id")?,
        kind,
        name: row.get("name")?,
        code: row.get("code")?,
        position: row.get("position")?,
        photo_url: row.get("photo_url")?,
        column_id: row.get("column_id")?,
        sub_id: row.get("sub_id")?,
    };
    card.validate().map_err(|err| {
        RepoError::InvalidData(format!("card `{}` failed validation: {err}", card.id))
    })?;
    Ok(card)
}
