//! Presentation layer: a view tree mirroring the board hierarchy.
//!
//! # Responsibility
//! - Collect and validate user input through explicit form objects.
//! - Translate user actions and drop events into hierarchy operations.
//! - Refresh only the affected part of the view after each mutation.
//!
//! # Invariants
//! - No hierarchy call is made before the related form validates.
//! - A cancelled prompt or declined confirmation leaves storage untouched.

pub mod controller;
pub mod form;
pub mod input;
pub mod render;
pub mod view;

pub use controller::{ActionOutcome, BoardAction, BoardController, DropEvent, DropTarget};
pub use form::{CardEditForm, CardForm, FormError, TitleForm};
pub use input::{InputSource, ScriptedInput};
pub use view::{BoardView, ColumnView, SubcolumnView};
