//! Board hierarchy use-case service.
//!
//! # Responsibility
//! - Validate hierarchy invariants above the repository layer.
//! - Provide column/subcolumn/card create, edit, move, reorder and cascading
//!   delete operations.
//!
//! # Invariants
//! - A card's subcolumn, when set, belongs to the card's column.
//! - Cascading deletes leave no orphan subcolumns or cards.
//! - Column reorder writes `order == index` for each named column.

use crate::model::card::{Card, CardDraft, CardFields, CardValidationError};
use crate::model::column::{Column, ColumnId};
use crate::model::normalize_title;
use crate::model::subcolumn::{Subcolumn, SubcolumnId};
use crate::repo::{BoardRepository, CascadeReport, RepoError};
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Subcolumn delete mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubcolumnDeleteMode {
    /// Delete the subcolumn and every card in it.
    #[default]
    DeleteCards,
    /// Move the subcolumn's cards back to the column, then delete it.
    ReleaseCards,
}

/// Errors from board service operations.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    ColumnNotFound(ColumnId),
    SubcolumnNotFound(SubcolumnId),
    CardNotFound(String),
    /// Target subcolumn exists but is owned by another column.
    SubcolumnOutsideColumn {
        sub_id: SubcolumnId,
        column_id: ColumnId,
    },
    /// The same column id appears twice in a reorder request.
    DuplicateColumnInOrder(ColumnId),
    InvalidCard(CardValidationError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "title must not be blank"),
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::SubcolumnNotFound(id) => write!(f, "subcolumn not found: {id}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::SubcolumnOutsideColumn { sub_id, column_id } => {
                write!(f, "subcolumn {sub_id} does not belong to column {column_id}")
            }
            Self::DuplicateColumnInOrder(id) => {
                write!(f, "column listed more than once in order: {id}")
            }
            Self::InvalidCard(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCard(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BoardServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ColumnNotFound(id) => Self::ColumnNotFound(id),
            RepoError::SubcolumnNotFound(id) => Self::SubcolumnNotFound(id),
            RepoError::CardNotFound(id) => Self::CardNotFound(id),
            RepoError::Validation(err) => Self::InvalidCard(err),
            other => Self::Repo(other),
        }
    }
}

impl From<CardValidationError> for BoardServiceError {
    fn from(value: CardValidationError) -> Self {
        Self::InvalidCard(value)
    }
}

pub type ServiceResult<T> = Result<T, BoardServiceError>;

/// Board hierarchy service facade.
pub struct BoardService<R: BoardRepository> {
    repo: R,
}

impl<R: BoardRepository> BoardService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one column at the end of the board.
    pub fn create_column(&self, title: &str) -> ServiceResult<Column> {
        let title = normalize_title(title).ok_or(BoardServiceError::InvalidTitle)?;
        let column = self
            .repo
            .create_column(&title)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("column_create", err))?;
        info!(
            "event=column_create module=board status=ok column_id={}",
            column.column_id
        );
        Ok(column)
    }

    pub fn get_column(&self, column_id: &str) -> ServiceResult<Option<Column>> {
        Ok(self.repo.get_column(column_id)?)
    }

    /// Lists columns in board order.
    pub fn list_columns(&self) -> ServiceResult<Vec<Column>> {
        Ok(self.repo.list_columns()?)
    }

    /// Deletes a column, its subcolumns, and every card it owns.
    pub fn delete_column(&self, column_id: &str) -> ServiceResult<CascadeReport> {
        let report = self
            .repo
            .delete_column_cascade(column_id)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("column_delete", err))?;
        info!(
            "event=column_delete module=board status=ok column_id={} subcolumns_removed={} cards_removed={}",
            column_id, report.subcolumns_removed, report.cards_removed
        );
        Ok(report)
    }

    /// Persists a new column order.
    ///
    /// # Contract
    /// - The i-th id receives `order == i`.
    /// - Unknown or repeated ids reject the whole request; nothing is written.
    /// - Columns not named keep their relative order after the named ones.
    pub fn reorder_columns(&self, ordered_ids: &[ColumnId]) -> ServiceResult<()> {
        let existing = self.repo.list_columns()?;
        let known: HashSet<&str> = existing.iter().map(|c| c.column_id.as_str()).collect();

        let mut seen = HashSet::new();
        for column_id in ordered_ids {
            if !known.contains(column_id.as_str()) {
                return Err(BoardServiceError::ColumnNotFound(column_id.clone()));
            }
            if !seen.insert(column_id.as_str()) {
                return Err(BoardServiceError::DuplicateColumnInOrder(column_id.clone()));
            }
        }

        let mut full_order = ordered_ids.to_vec();
        full_order.extend(
            existing
                .iter()
                .filter(|column| !seen.contains(column.column_id.as_str()))
                .map(|column| column.column_id.clone()),
        );

        self.repo
            .reorder_columns(&full_order)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("column_reorder", err))?;
        info!(
            "event=column_reorder module=board status=ok columns={}",
            full_order.len()
        );
        Ok(())
    }

    /// Creates one subcolumn inside an existing column.
    pub fn create_subcolumn(&self, column_id: &str, title: &str) -> ServiceResult<Subcolumn> {
        let title = normalize_title(title).ok_or(BoardServiceError::InvalidTitle)?;
        let subcolumn = self
            .repo
            .create_subcolumn(column_id, &title)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("subcolumn_create", err))?;
        info!(
            "event=subcolumn_create module=board status=ok column_id={} sub_id={}",
            column_id, subcolumn.sub_id
        );
        Ok(subcolumn)
    }

    /// Creates one subcolumn that takes over the column's direct cards.
    ///
    /// Returns the subcolumn and how many cards moved into it.
    pub fn create_subcolumn_adopting_cards(
        &self,
        column_id: &str,
        title: &str,
    ) -> ServiceResult<(Subcolumn, usize)> {
        let title = normalize_title(title).ok_or(BoardServiceError::InvalidTitle)?;
        let (subcolumn, adopted) = self
            .repo
            .create_subcolumn_adopting(column_id, &title)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("subcolumn_create", err))?;
        info!(
            "event=subcolumn_create module=board status=ok column_id={} sub_id={} cards_adopted={}",
            column_id, subcolumn.sub_id, adopted
        );
        Ok((subcolumn, adopted))
    }

    pub fn get_subcolumn(&self, sub_id: &str) -> ServiceResult<Option<Subcolumn>> {
        Ok(self.repo.get_subcolumn(sub_id)?)
    }

    /// Lists subcolumns of one existing column.
    pub fn list_subcolumns(&self, column_id: &str) -> ServiceResult<Vec<Subcolumn>> {
        self.ensure_column_exists(column_id)?;
        Ok(self.repo.list_subcolumns(column_id)?)
    }

    /// Deletes a subcolumn by mode.
    pub fn delete_subcolumn(
        &self,
        sub_id: &str,
        mode: SubcolumnDeleteMode,
    ) -> ServiceResult<CascadeReport> {
        let result = match mode {
            SubcolumnDeleteMode::DeleteCards => self.repo.delete_subcolumn_cascade(sub_id),
            SubcolumnDeleteMode::ReleaseCards => self.repo.delete_subcolumn_release(sub_id),
        };
        let report = result
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("subcolumn_delete", err))?;
        info!(
            "event=subcolumn_delete module=board status=ok sub_id={} mode={:?} cards_removed={} cards_released={}",
            sub_id, mode, report.cards_removed, report.cards_released
        );
        Ok(report)
    }

    /// Creates a card from a validated draft in the given container.
    pub fn create_card(
        &self,
        column_id: &str,
        sub_id: Option<&str>,
        draft: &CardDraft,
    ) -> ServiceResult<Card> {
        draft.validate()?;
        self.ensure_container(column_id, sub_id)?;

        let card = Card::from_draft(draft, column_id.to_string(), sub_id.map(str::to_string));
        self.repo
            .create_card(&card)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("card_create", err))?;
        info!(
            "event=card_create module=board status=ok card_id={} type={}",
            card.id,
            card.kind.as_str()
        );
        Ok(card)
    }

    pub fn get_card(&self, card_id: &str) -> ServiceResult<Option<Card>> {
        Ok(self.repo.get_card(card_id)?)
    }

    /// Replaces a card's content fields; type and placement stay unchanged.
    pub fn update_card(&self, card_id: &str, fields: &CardFields) -> ServiceResult<Card> {
        let mut card = self
            .repo
            .get_card(card_id)?
            .ok_or_else(|| BoardServiceError::CardNotFound(card_id.to_string()))?;
        card.apply_fields(fields);
        card.validate()?;

        self.repo
            .update_card(&card)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("card_update", err))?;
        info!("event=card_update module=board status=ok card_id={card_id}");
        Ok(card)
    }

    pub fn delete_card(&self, card_id: &str) -> ServiceResult<()> {
        self.repo
            .delete_card(card_id)
            .map_err(BoardServiceError::from)
            .inspect_err(|err| log_failure("card_delete", err))?;
        info!("event=card_delete module=board status=ok card_id={card_id}");
        Ok(())
    }

    /// Repoints a card to a new column and optional subcolumn.
    ///
    /// # Errors
    /// - `CardNotFound` when the card no longer exists.
    /// - `ColumnNotFound` / `SubcolumnNotFound` / `SubcolumnOutsideColumn` when
    ///   the target container is invalid.
    pub fn move_card(
        &self,
        card_id: &str,
        new_column_id: &str,
        new_sub_id: Option<&str>,
    ) -> ServiceResult<()> {
        let result = self
            .ensure_container(new_column_id, new_sub_id)
            .and_then(|()| {
                self.repo
                    .move_card(card_id, new_column_id, new_sub_id)
                    .map_err(BoardServiceError::from)
            });
        result.inspect_err(|err| log_failure("card_move", err))?;
        info!(
            "event=card_move module=board status=ok card_id={} column_id={} sub_id={}",
            card_id,
            new_column_id,
            new_sub_id.unwrap_or("-")
        );
        Ok(())
    }

    /// Lists cards of one container; `sub_id = None` lists direct cards.
    pub fn list_cards_in(&self, column_id: &str, sub_id: Option<&str>) -> ServiceResult<Vec<Card>> {
        Ok(self.repo.list_cards(column_id, sub_id)?)
    }

    pub fn list_all_cards(&self) -> ServiceResult<Vec<Card>> {
        Ok(self.repo.list_all_cards()?)
    }

    fn ensure_column_exists(&self, column_id: &str) -> ServiceResult<()> {
        self.repo
            .get_column(column_id)?
            .ok_or_else(|| BoardServiceError::ColumnNotFound(column_id.to_string()))?;
        Ok(())
    }

    fn ensure_container(&self, column_id: &str, sub_id: Option<&str>) -> ServiceResult<()> {
        self.ensure_column_exists(column_id)?;
        if let Some(sub_id) = sub_id {
            let subcolumn = self
                .repo
                .get_subcolumn(sub_id)?
                .ok_or_else(|| BoardServiceError::SubcolumnNotFound(sub_id.to_string()))?;
            if subcolumn.column_id != column_id {
                return Err(BoardServiceError::SubcolumnOutsideColumn {
                    sub_id: sub_id.to_string(),
                    column_id: column_id.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn log_failure(event: &str, err: &BoardServiceError) {
    error!("event={event} module=board status=error error={err}");
}
