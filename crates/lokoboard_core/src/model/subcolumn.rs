//! Optional second-level grouping inside a column.

use super::column::ColumnId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subcolumn identifier, `sub-` prefixed.
pub type SubcolumnId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcolumn {
    pub sub_id: SubcolumnId,
    /// Owning column; never changes after creation.
    pub column_id: ColumnId,
    pub title: String,
}

impl Subcolumn {
    /// Generates a fresh subcolumn id.
    pub fn generate_id() -> SubcolumnId {
        format!("sub-{}", Uuid::new_v4())
    }
}
