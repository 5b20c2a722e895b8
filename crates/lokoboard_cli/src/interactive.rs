//! Menu loop for the interactive session.

use crate::prompt::{Console, CANCEL_TOKEN};
use lokoboard_core::{
    ActionOutcome, BoardAction, BoardController, BoardRepository, DropEvent, DropTarget,
    InputSource, SubcolumnDeleteMode,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};

const MENU: &str = "\
1) add column      2) add subcolumn     3) add card
4) edit card       5) delete card       6) move card
7) reorder columns 8) delete subcolumn  9) delete column
s) show board      r) reload            q) quit";

/// Runs the menu until `q` or end of input.
///
/// Action failures are printed and the loop continues; only console write
/// errors end the session early.
pub fn run_session<R, I, O>(
    controller: &mut BoardController<R>,
    console: &mut Console<I, O>,
) -> io::Result<()>
where
    R: BoardRepository,
    I: BufRead,
    O: Write,
{
    info!("event=session_start module=cli status=ok");
    console.say(controller.view())?;
    console.say(format!("(enter {CANCEL_TOKEN} at any prompt to cancel)"))?;

    loop {
        console.say(MENU)?;
        let Some(choice) = console.prompt("Choice", None) else {
            break;
        };
        let choice = choice.trim().to_ascii_lowercase();

        match choice.as_str() {
            "q" | "quit" => break,
            "s" | "show" => {
                console.say(controller.view())?;
                continue;
            }
            "r" | "reload" => {
                if let Err(err) = controller.reload() {
                    report_failure(console, &err)?;
                }
                console.say(controller.view())?;
                continue;
            }
            _ => {}
        }

        let Some(action) = read_action(&choice, console) else {
            console.say("Cancelled.")?;
            continue;
        };

        match controller.handle(action, console) {
            Ok(ActionOutcome::Applied) => console.say(controller.view())?,
            Ok(ActionOutcome::Cancelled) => console.say("Cancelled.")?,
            Ok(ActionOutcome::Rejected(reason)) => console.say(format!("Rejected: {reason}"))?,
            Err(err) => report_failure(console, &err)?,
        }
    }

    info!("event=session_end module=cli status=ok");
    Ok(())
}

/// Asks for the ids an action needs; `None` when cancelled or unknown.
fn read_action(choice: &str, input: &mut dyn InputSource) -> Option<BoardAction> {
    let action = match choice {
        "1" => BoardAction::AddColumn,
        "2" => BoardAction::AddSubcolumn {
            column_id: read_id(input, "Column id")?,
        },
        "3" => BoardAction::AddCard {
            column_id: read_id(input, "Column id")?,
            sub_id: read_optional_id(input, "Subcolumn id (blank for the column itself)")?,
        },
        "4" => BoardAction::EditCard {
            card_id: read_id(input, "Card id")?,
        },
        "5" => BoardAction::DeleteCard {
            card_id: read_id(input, "Card id")?,
        },
        "6" => {
            let card_id = read_id(input, "Card id")?;
            let column_id = read_id(input, "Target column id")?;
            let sub_id =
                read_optional_id(input, "Target subcolumn id (blank for the column itself)")?;
            BoardAction::Drop(DropEvent::Card {
                card_id,
                target: DropTarget { column_id, sub_id },
            })
        }
        "7" => {
            let line = input.prompt("Column ids in the new order (space separated)", None)?;
            let ordered_ids: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if ordered_ids.is_empty() {
                return None;
            }
            BoardAction::Drop(DropEvent::Columns { ordered_ids })
        }
        "8" => {
            let sub_id = read_id(input, "Subcolumn id")?;
            let mode = if input.confirm("Keep its cards in the column?") {
                SubcolumnDeleteMode::ReleaseCards
            } else {
                SubcolumnDeleteMode::DeleteCards
            };
            BoardAction::DeleteSubcolumn { sub_id, mode }
        }
        "9" => BoardAction::DeleteColumn {
            column_id: read_id(input, "Column id")?,
        },
        other => {
            warn!("event=session_choice module=cli status=rejected choice={other}");
            return None;
        }
    };
    Some(action)
}

fn read_id(input: &mut dyn InputSource, label: &str) -> Option<String> {
    input
        .prompt(label, None)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Outer `None` is a cancel; inner `None` means "no subcolumn".
fn read_optional_id(input: &mut dyn InputSource, label: &str) -> Option<Option<String>> {
    let value = input.prompt(label, None)?;
    let value = value.trim();
    Some((!value.is_empty()).then(|| value.to_string()))
}

fn report_failure<I: BufRead, O: Write>(
    console: &mut Console<I, O>,
    err: &dyn std::error::Error,
) -> io::Result<()> {
    warn!("event=session_action module=cli status=error error={err}");
    console.say(format!("error: {err}"))
}
