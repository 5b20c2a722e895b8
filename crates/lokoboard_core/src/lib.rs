//! Core domain logic for the locomotive crew board.
//! This crate owns the hierarchy invariants: columns -> subcolumns -> cards.

pub mod board;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::{
    ActionOutcome, BoardAction, BoardController, BoardView, DropEvent, DropTarget, InputSource,
    ScriptedInput,
};
pub use db::{BoardStore, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::card::{Card, CardDraft, CardFields, CardId, CardType, CardValidationError};
pub use model::column::{Column, ColumnId};
pub use model::subcolumn::{Subcolumn, SubcolumnId};
pub use repo::{
    BoardRepository, CardRepository, CascadeReport, ColumnRepository, RepoError, RepoResult,
    SqliteBoardRepository, SubcolumnRepository,
};
pub use service::board_service::{
    BoardService, BoardServiceError, ServiceResult, SubcolumnDeleteMode,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
