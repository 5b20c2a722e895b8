//! View tree mirroring columns -> subcolumns -> cards.

use crate::model::card::Card;
use crate::model::column::Column;
use crate::model::subcolumn::Subcolumn;
use crate::repo::BoardRepository;
use crate::service::board_service::{BoardService, ServiceResult};
use serde::Serialize;

/// Whole board as shown to the user, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub column: Column,
    /// Cards sitting directly in the column.
    pub direct_cards: Vec<Card>,
    pub subcolumns: Vec<SubcolumnView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcolumnView {
    pub subcolumn: Subcolumn,
    pub cards: Vec<Card>,
}

impl BoardView {
    /// Builds the full tree from storage.
    pub fn load<R: BoardRepository>(service: &BoardService<R>) -> ServiceResult<Self> {
        let columns = service
            .list_columns()?
            .into_iter()
            .map(|column| ColumnView::load(service, column))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(Self { columns })
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnView> {
        self.columns
            .iter()
            .find(|view| view.column.column_id == column_id)
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.columns.iter().find_map(|view| view.find_card(card_id))
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(ColumnView::card_count).sum()
    }

    /// Replaces the subtree of one column, or inserts it by order.
    pub fn upsert_column(&mut self, view: ColumnView) {
        match self
            .columns
            .iter_mut()
            .find(|current| current.column.column_id == view.column.column_id)
        {
            Some(current) => *current = view,
            None => self.columns.push(view),
        }
        self.sort_columns();
    }

    /// Drops one column subtree; returns whether it was present.
    pub fn remove_column(&mut self, column_id: &str) -> bool {
        let before = self.columns.len();
        self.columns
            .retain(|view| view.column.column_id != column_id);
        self.columns.len() != before
    }

    /// Applies persisted `order` values without reloading cards.
    pub fn apply_column_order(&mut self, columns: &[Column]) {
        for view in &mut self.columns {
            if let Some(column) = columns
                .iter()
                .find(|column| column.column_id == view.column.column_id)
            {
                view.column.order = column.order;
            }
        }
        self.sort_columns();
    }

    fn sort_columns(&mut self) {
        self.columns.sort_by(|a, b| {
            a.column
                .order
                .cmp(&b.column.order)
                .then_with(|| a.column.column_id.cmp(&b.column.column_id))
        });
    }
}

impl ColumnView {
    pub fn empty(column: Column) -> Self {
        Self {
            column,
            direct_cards: Vec::new(),
            subcolumns: Vec::new(),
        }
    }

    /// Loads one column subtree from storage.
    pub fn load<R: BoardRepository>(
        service: &BoardService<R>,
        column: Column,
    ) -> ServiceResult<Self> {
        let direct_cards = service.list_cards_in(&column.column_id, None)?;
        let subcolumns = service
            .list_subcolumns(&column.column_id)?
            .into_iter()
            .map(|subcolumn| -> ServiceResult<SubcolumnView> {
                let cards = service.list_cards_in(&column.column_id, Some(&subcolumn.sub_id))?;
                Ok(SubcolumnView { subcolumn, cards })
            })
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(Self {
            column,
            direct_cards,
            subcolumns,
        })
    }

    /// Direct cards are shown while there are no subcolumns, or when some
    /// remain after subcolumns were added.
    pub fn shows_direct_cards(&self) -> bool {
        self.subcolumns.is_empty() || !self.direct_cards.is_empty()
    }

    pub fn subcolumn(&self, sub_id: &str) -> Option<&SubcolumnView> {
        self.subcolumns
            .iter()
            .find(|view| view.subcolumn.sub_id == sub_id)
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.direct_cards
            .iter()
            .chain(self.subcolumns.iter().flat_map(|view| view.cards.iter()))
            .find(|card| card.id == card_id)
    }

    pub fn card_count(&self) -> usize {
        self.direct_cards.len()
            + self
                .subcolumns
                .iter()
                .map(|view| view.cards.len())
                .sum::<usize>()
    }
}
