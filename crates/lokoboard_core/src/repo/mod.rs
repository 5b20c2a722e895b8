//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-collection data access contracts (columns, subcolumns, cards).
//! - Isolate SQLite query details from hierarchy orchestration.
//!
//! # Invariants
//! - Card writes enforce `Card::validate()` before persistence.
//! - Multi-record cascades run inside one immediate transaction.
//! - Repository APIs return semantic not-found errors in addition to DB
//!   transport errors.

pub mod board_repo;
pub mod card_repo;
pub mod column_repo;
pub mod subcolumn_repo;

pub use board_repo::{BoardRepository, CascadeReport, RepoError, RepoResult, SqliteBoardRepository};
pub use card_repo::CardRepository;
pub use column_repo::ColumnRepository;
pub use subcolumn_repo::SubcolumnRepository;
