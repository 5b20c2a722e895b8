//! Top-level board lane.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column identifier, `col-` prefixed.
pub type ColumnId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_id: ColumnId,
    pub title: String,
    /// Position on the board, dense from zero after a reorder.
    pub order: i64,
}

impl Column {
    /// Generates a fresh column id.
    pub fn generate_id() -> ColumnId {
        format!("col-{}", Uuid::new_v4())
    }
}
