//! Subcommand dispatch.

use crate::cli::Command;
use crate::interactive::run_session;
use crate::prompt::Console;
use lokoboard_core::{
    ActionOutcome, BoardAction, BoardController, BoardService, BoardStore, BoardView,
    InputSource, ScriptedInput, SqliteBoardRepository, SubcolumnDeleteMode,
};
use std::error::Error;
use std::io::{BufRead, Write};

/// Runs one command against an open store.
///
/// Deletes ask on `console` unless `--yes` was given.
pub fn execute<I: BufRead, O: Write>(
    store: &BoardStore,
    command: Command,
    console: &mut Console<I, O>,
) -> Result<(), Box<dyn Error>> {
    let service = BoardService::new(SqliteBoardRepository::try_new(store.conn())?);

    match command {
        Command::Interactive => {
            let mut controller = BoardController::load(service)?;
            run_session(&mut controller, console)?;
        }
        Command::Show { json } => {
            let view = BoardView::load(&service)?;
            if json {
                console.say(serde_json::to_string_pretty(&view)?)?;
            } else {
                console.say(&view)?;
            }
        }
        Command::AddColumn { title } => {
            let column = service.create_column(&title)?;
            console.say(column.column_id)?;
        }
        Command::AddSubcolumn { column_id, title } => {
            let subcolumn = if service.list_subcolumns(&column_id)?.is_empty() {
                let (subcolumn, adopted) =
                    service.create_subcolumn_adopting_cards(&column_id, &title)?;
                if adopted > 0 {
                    console.say(format!("{adopted} card(s) moved into the new subcolumn"))?;
                }
                subcolumn
            } else {
                service.create_subcolumn(&column_id, &title)?
            };
            console.say(subcolumn.sub_id)?;
        }
        Command::DeleteColumn { column_id, yes } => {
            let action = BoardAction::DeleteColumn { column_id };
            confirm_and_apply(service, action, yes, console)?;
        }
        Command::DeleteSubcolumn {
            sub_id,
            release,
            yes,
        } => {
            let mode = if release {
                SubcolumnDeleteMode::ReleaseCards
            } else {
                SubcolumnDeleteMode::DeleteCards
            };
            let action = BoardAction::DeleteSubcolumn { sub_id, mode };
            confirm_and_apply(service, action, yes, console)?;
        }
        Command::MoveCard {
            card_id,
            column_id,
            sub,
        } => {
            service.move_card(&card_id, &column_id, sub.as_deref())?;
            console.say(format!("Moved {card_id}."))?;
        }
        Command::Reorder { ids } => {
            service.reorder_columns(&ids)?;
            for column in service.list_columns()? {
                console.say(format!("{} {} {}", column.order, column.column_id, column.title))?;
            }
        }
    }
    Ok(())
}

fn confirm_and_apply<I: BufRead, O: Write>(
    service: BoardService<SqliteBoardRepository<'_>>,
    action: BoardAction,
    assume_yes: bool,
    console: &mut Console<I, O>,
) -> Result<(), Box<dyn Error>> {
    let mut controller = BoardController::load(service)?;
    let mut auto_yes = ScriptedInput::new().confirm_by_default(true);
    let input: &mut dyn InputSource = if assume_yes { &mut auto_yes } else { &mut *console };

    match controller.handle(action, input)? {
        ActionOutcome::Applied => console.say("Deleted.")?,
        ActionOutcome::Cancelled => console.say("Cancelled.")?,
        ActionOutcome::Rejected(reason) => return Err(reason.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::cli::Command;
    use crate::prompt::Console;
    use lokoboard_core::{
        BoardService, BoardStore, CardDraft, CardFields, CardType, SqliteBoardRepository,
    };
    use std::io::Cursor;

    fn run(store: &BoardStore, command: Command, stdin: &str) -> String {
        let mut console = Console::new(Cursor::new(stdin.as_bytes().to_vec()), Vec::new());
        execute(store, command, &mut console).unwrap();
        String::from_utf8(console.into_writer()).unwrap()
    }

    fn service(store: &BoardStore) -> BoardService<SqliteBoardRepository<'_>> {
        BoardService::new(SqliteBoardRepository::try_new(store.conn()).unwrap())
    }

    fn locomotive() -> CardDraft {
        CardDraft {
            kind: CardType::Locomotive,
            fields: CardFields {
                name: "VL80".to_string(),
                code: "VL80-1501".to_string(),
                position: None,
                photo_url: None,
            },
        }
    }

    #[test]
    fn add_column_prints_new_id() {
        let store = BoardStore::open_in_memory().unwrap();
        let output = run(
            &store,
            Command::AddColumn {
                title: "Depot".to_string(),
            },
            "",
        );
        let columns = service(&store).list_columns().unwrap();
        assert_eq!(output.trim(), columns[0].column_id);
    }

    #[test]
    fn first_subcolumn_reports_adopted_cards() {
        let store = BoardStore::open_in_memory().unwrap();
        let column = service(&store).create_column("Depot").unwrap();
        service(&store)
            .create_card(&column.column_id, None, &locomotive())
            .unwrap();

        let output = run(
            &store,
            Command::AddSubcolumn {
                column_id: column.column_id.clone(),
                title: "Repair".to_string(),
            },
            "",
        );

        assert!(output.contains("1 card(s) moved"));
        assert!(service(&store)
            .list_cards_in(&column.column_id, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn delete_column_waits_for_confirmation() {
        let store = BoardStore::open_in_memory().unwrap();
        let column = service(&store).create_column("Depot").unwrap();

        let output = run(
            &store,
            Command::DeleteColumn {
                column_id: column.column_id.clone(),
                yes: false,
            },
            "n\n",
        );
        assert!(output.contains("Cancelled."));
        assert_eq!(service(&store).list_columns().unwrap().len(), 1);

        let output = run(
            &store,
            Command::DeleteColumn {
                column_id: column.column_id,
                yes: true,
            },
            "",
        );
        assert!(output.contains("Deleted."));
        assert!(service(&store).list_columns().unwrap().is_empty());
    }

    #[test]
    fn delete_subcolumn_with_release_keeps_cards() {
        let store = BoardStore::open_in_memory().unwrap();
        let column = service(&store).create_column("Depot").unwrap();
        let sub = service(&store)
            .create_subcolumn(&column.column_id, "Repair")
            .unwrap();
        service(&store)
            .create_card(&column.column_id, Some(&sub.sub_id), &locomotive())
            .unwrap();

        run(
            &store,
            Command::DeleteSubcolumn {
                sub_id: sub.sub_id,
                release: true,
                yes: false,
            },
            "y\n",
        );

        let direct = service(&store)
            .list_cards_in(&column.column_id, None)
            .unwrap();
        assert_eq!(direct.len(), 1);
    }

    #[test]
    fn move_of_missing_card_is_an_error() {
        let store = BoardStore::open_in_memory().unwrap();
        let column = service(&store).create_column("Depot").unwrap();
        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());

        let err = execute(
            &store,
            Command::MoveCard {
                card_id: "loco-missing".to_string(),
                column_id: column.column_id,
                sub: None,
            },
            &mut console,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "card not found: loco-missing");
    }

    #[test]
    fn show_json_nests_cards_under_columns() {
        let store = BoardStore::open_in_memory().unwrap();
        let column = service(&store).create_column("Depot").unwrap();
        service(&store)
            .create_card(&column.column_id, None, &locomotive())
            .unwrap();

        let output = run(&store, Command::Show { json: true }, "");
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["columns"][0]["column"]["title"], "Depot");
        assert_eq!(json["columns"][0]["directCards"][0]["type"], "locomotive");
    }

    #[test]
    fn reorder_prints_final_order() {
        let store = BoardStore::open_in_memory().unwrap();
        let a = service(&store).create_column("A").unwrap();
        let b = service(&store).create_column("B").unwrap();

        let output = run(
            &store,
            Command::Reorder {
                ids: vec![b.column_id.clone()],
            },
            "",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], format!("0 {} B", b.column_id));
        assert_eq!(lines[1], format!("1 {} A", a.column_id));
    }
}
