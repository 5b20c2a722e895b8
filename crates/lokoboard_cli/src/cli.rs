//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lokoboard")]
#[command(version, about = "Board of locomotives and crews, stored in SQLite")]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./lokoboard.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Board database file; overrides `db_path` from the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides `log_level`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Menu-driven session on stdin/stdout (default)
    Interactive,
    /// Print the whole board
    Show {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Add a column at the end of the board
    AddColumn { title: String },
    /// Add a subcolumn; the first one takes over the column's cards
    AddSubcolumn { column_id: String, title: String },
    /// Delete a column with all its subcolumns and cards
    DeleteColumn {
        column_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete a subcolumn and its cards
    DeleteSubcolumn {
        sub_id: String,
        /// Move the cards back to the column instead of deleting them
        #[arg(long)]
        release: bool,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move a card to another column or subcolumn
    MoveCard {
        card_id: String,
        column_id: String,
        /// Target subcolumn; omit to place the card directly in the column
        #[arg(long)]
        sub: Option<String>,
    },
    /// Set the column order; columns not listed keep their order after these
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}
