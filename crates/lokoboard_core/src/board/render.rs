//! Plain-text rendering of the board view.

use super::view::{BoardView, ColumnView};
use crate::model::card::{Card, CardType};
use std::fmt::{self, Display, Formatter};

/// One-line card title, e.g. `Engineer: Petrov P.`.
pub fn card_headline(card: &Card) -> String {
    format!("{}: {}", card.kind.label(), card.name)
}

/// Detail lines shown under the headline.
pub fn card_details(card: &Card) -> Vec<String> {
    let mut lines = match card.kind {
        CardType::Locomotive => vec![format!("Code: {}", card.code)],
        CardType::Engineer | CardType::Assistant => vec![
            format!("Position: {}", card.position.as_deref().unwrap_or("-")),
            format!("Service no.: {}", card.code),
        ],
    };
    if let Some(photo_url) = &card.photo_url {
        lines.push(format!("Photo: {photo_url}"));
    }
    lines
}

impl Display for BoardView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "Board is empty. Add a column to get started.");
        }
        for column in &self.columns {
            write_column(f, column)?;
        }
        Ok(())
    }
}

fn write_column(f: &mut Formatter<'_>, view: &ColumnView) -> fmt::Result {
    writeln!(f, "[{}] {}", view.column.column_id, view.column.title)?;
    if view.shows_direct_cards() {
        for card in &view.direct_cards {
            write_card(f, card, 1)?;
        }
    }
    for sub in &view.subcolumns {
        writeln!(f, "  [{}] {}", sub.subcolumn.sub_id, sub.subcolumn.title)?;
        for card in &sub.cards {
            write_card(f, card, 2)?;
        }
    }
    Ok(())
}

fn write_card(f: &mut Formatter<'_>, card: &Card, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    writeln!(f, "{indent}- {} [{}]", card_headline(card), card.id)?;
    for line in card_details(card) {
        writeln!(f, "{indent}    {line}")?;
    }
    Ok(())
}
