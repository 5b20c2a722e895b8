//! Board controller: user actions in, hierarchy calls out.
//!
//! # Responsibility
//! - Run the input flow for each action (prompts, confirmation).
//! - Call the hierarchy service only with validated input.
//! - Patch the affected column subtree of the view after each mutation.
//!
//! # Invariants
//! - Cancelled prompts and declined confirmations return
//!   `ActionOutcome::Cancelled` with storage untouched.
//! - An invalid card type raises an alert and returns
//!   `ActionOutcome::Rejected`; nothing is written.
//! - A blank title is `Rejected` without an alert.

use super::form::{CardEditForm, CardForm, FormError, TitleForm};
use super::input::InputSource;
use super::view::{BoardView, ColumnView};
use crate::model::card::CardId;
use crate::model::column::ColumnId;
use crate::model::subcolumn::SubcolumnId;
use crate::repo::BoardRepository;
use crate::service::board_service::{
    BoardService, BoardServiceError, ServiceResult, SubcolumnDeleteMode,
};
use log::{debug, warn};

/// Container a card was dropped into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub column_id: ColumnId,
    /// `None` when dropped into the column's direct card area.
    pub sub_id: Option<SubcolumnId>,
}

/// Drag-and-drop completion events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEvent {
    Card { card_id: CardId, target: DropTarget },
    /// New left-to-right column sequence after a column drag.
    Columns { ordered_ids: Vec<ColumnId> },
}

/// User actions the board understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    AddColumn,
    AddSubcolumn { column_id: ColumnId },
    DeleteColumn { column_id: ColumnId },
    DeleteSubcolumn {
        sub_id: SubcolumnId,
        mode: SubcolumnDeleteMode,
    },
    AddCard {
        column_id: ColumnId,
        sub_id: Option<SubcolumnId>,
    },
    EditCard { card_id: CardId },
    DeleteCard { card_id: CardId },
    Drop(DropEvent),
}

/// What happened to one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// User cancelled a prompt or declined a confirmation.
    Cancelled,
    /// Input failed validation; carries a user-facing reason.
    Rejected(String),
}

/// Owns the hierarchy service and the current view tree.
pub struct BoardController<R: BoardRepository> {
    service: BoardService<R>,
    view: BoardView,
}

impl<R: BoardRepository> BoardController<R> {
    /// Loads the full board view from storage.
    pub fn load(service: BoardService<R>) -> ServiceResult<Self> {
        let view = BoardView::load(&service)?;
        Ok(Self { service, view })
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn service(&self) -> &BoardService<R> {
        &self.service
    }

    /// Rebuilds the whole view from storage.
    pub fn reload(&mut self) -> ServiceResult<()> {
        self.view = BoardView::load(&self.service)?;
        Ok(())
    }

    /// Runs one action end to end.
    ///
    /// # Errors
    /// - Storage and hierarchy failures from the service, e.g. `CardNotFound`
    ///   when a dropped card was deleted meanwhile.
    pub fn handle(
        &mut self,
        action: BoardAction,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        debug!("event=board_action module=board status=start action={action:?}");
        match action {
            BoardAction::AddColumn => self.add_column(input),
            BoardAction::AddSubcolumn { column_id } => self.add_subcolumn(&column_id, input),
            BoardAction::DeleteColumn { column_id } => self.delete_column(&column_id, input),
            BoardAction::DeleteSubcolumn { sub_id, mode } => {
                self.delete_subcolumn(&sub_id, mode, input)
            }
            BoardAction::AddCard { column_id, sub_id } => {
                self.add_card(&column_id, sub_id.as_deref(), input)
            }
            BoardAction::EditCard { card_id } => self.edit_card(&card_id, input),
            BoardAction::DeleteCard { card_id } => self.delete_card(&card_id, input),
            BoardAction::Drop(event) => self.apply_drop(event),
        }
    }

    fn add_column(&mut self, input: &mut dyn InputSource) -> ServiceResult<ActionOutcome> {
        let title = match collect_title(input, "Column title") {
            Ok(Some(title)) => title,
            Ok(None) => return Ok(ActionOutcome::Cancelled),
            Err(err) => return Ok(reject(input, err)),
        };
        let column = self.service.create_column(&title)?;
        self.view.upsert_column(ColumnView::empty(column));
        Ok(ActionOutcome::Applied)
    }

    fn add_subcolumn(
        &mut self,
        column_id: &str,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        let title = match collect_title(input, "Subcolumn title") {
            Ok(Some(title)) => title,
            Ok(None) => return Ok(ActionOutcome::Cancelled),
            Err(err) => return Ok(reject(input, err)),
        };

        // The first subcolumn takes over cards already sitting in the column.
        let adopt = self
            .view
            .column(column_id)
            .is_some_and(|view| view.subcolumns.is_empty() && !view.direct_cards.is_empty());
        if adopt {
            self.service
                .create_subcolumn_adopting_cards(column_id, &title)?;
        } else {
            self.service.create_subcolumn(column_id, &title)?;
        }

        self.refresh_column(column_id)?;
        Ok(ActionOutcome::Applied)
    }

    fn delete_column(
        &mut self,
        column_id: &str,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        let column = self
            .service
            .get_column(column_id)?
            .ok_or_else(|| BoardServiceError::ColumnNotFound(column_id.to_string()))?;
        let message = format!(
            "Delete column \"{}\"? All its subcolumns and cards will be lost.",
            column.title
        );
        if !input.confirm(&message) {
            return Ok(ActionOutcome::Cancelled);
        }

        self.service.delete_column(column_id)?;
        self.view.remove_column(column_id);
        Ok(ActionOutcome::Applied)
    }

    fn delete_subcolumn(
        &mut self,
        sub_id: &str,
        mode: SubcolumnDeleteMode,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        let subcolumn = self
            .service
            .get_subcolumn(sub_id)?
            .ok_or_else(|| BoardServiceError::SubcolumnNotFound(sub_id.to_string()))?;
        let message = match mode {
            SubcolumnDeleteMode::DeleteCards => format!(
                "Delete subcolumn \"{}\" and all its cards?",
                subcolumn.title
            ),
            SubcolumnDeleteMode::ReleaseCards => format!(
                "Delete subcolumn \"{}\"? Its cards move back to the column.",
                subcolumn.title
            ),
        };
        if !input.confirm(&message) {
            return Ok(ActionOutcome::Cancelled);
        }

        self.service.delete_subcolumn(sub_id, mode)?;
        self.refresh_column(&subcolumn.column_id)?;
        Ok(ActionOutcome::Applied)
    }

    fn add_card(
        &mut self,
        column_id: &str,
        sub_id: Option<&str>,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        let form = match CardForm::collect(input) {
            Ok(Some(form)) => form,
            Ok(None) => return Ok(ActionOutcome::Cancelled),
            Err(err) => return Ok(reject(input, err)),
        };
        let draft = match form.into_draft() {
            Ok(draft) => draft,
            Err(err) => return Ok(reject(input, err)),
        };

        self.service.create_card(column_id, sub_id, &draft)?;
        self.refresh_column(column_id)?;
        Ok(ActionOutcome::Applied)
    }

    fn edit_card(
        &mut self,
        card_id: &str,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        let card = self
            .service
            .get_card(card_id)?
            .ok_or_else(|| BoardServiceError::CardNotFound(card_id.to_string()))?;
        let Some(form) = CardEditForm::collect(input, &card) else {
            return Ok(ActionOutcome::Cancelled);
        };
        let fields = match form.into_fields(card.kind) {
            Ok(fields) => fields,
            Err(err) => return Ok(reject(input, err)),
        };

        self.service.update_card(card_id, &fields)?;
        self.refresh_column(&card.column_id)?;
        Ok(ActionOutcome::Applied)
    }

    fn delete_card(
        &mut self,
        card_id: &str,
        input: &mut dyn InputSource,
    ) -> ServiceResult<ActionOutcome> {
        let card = self
            .service
            .get_card(card_id)?
            .ok_or_else(|| BoardServiceError::CardNotFound(card_id.to_string()))?;
        if !input.confirm("Delete this card?") {
            return Ok(ActionOutcome::Cancelled);
        }

        self.service.delete_card(card_id)?;
        self.refresh_column(&card.column_id)?;
        Ok(ActionOutcome::Applied)
    }

    fn apply_drop(&mut self, event: DropEvent) -> ServiceResult<ActionOutcome> {
        match event {
            DropEvent::Card { card_id, target } => {
                let previous_column = self
                    .service
                    .get_card(&card_id)?
                    .map(|card| card.column_id);
                self.service
                    .move_card(&card_id, &target.column_id, target.sub_id.as_deref())?;

                self.refresh_column(&target.column_id)?;
                if let Some(previous) = previous_column {
                    if previous != target.column_id {
                        self.refresh_column(&previous)?;
                    }
                }
            }
            DropEvent::Columns { ordered_ids } => {
                self.service.reorder_columns(&ordered_ids)?;
                let columns = self.service.list_columns()?;
                self.view.apply_column_order(&columns);
            }
        }
        Ok(ActionOutcome::Applied)
    }

    fn refresh_column(&mut self, column_id: &str) -> ServiceResult<()> {
        match self.service.get_column(column_id)? {
            Some(column) => {
                let view = ColumnView::load(&self.service, column)?;
                self.view.upsert_column(view);
            }
            None => {
                self.view.remove_column(column_id);
            }
        }
        Ok(())
    }
}

/// `Ok(None)` when cancelled; `BlankTitle` for a whitespace-only answer.
fn collect_title(input: &mut dyn InputSource, label: &str) -> Result<Option<String>, FormError> {
    TitleForm::collect(input, label)
        .map(|form| form.validate())
        .transpose()
}

fn reject(input: &mut dyn InputSource, err: FormError) -> ActionOutcome {
    warn!("event=board_action module=board status=rejected error={err}");
    if let FormError::InvalidCardType(_) = err {
        input.alert("Invalid card type");
    }
    ActionOutcome::Rejected(err.to_string())
}
