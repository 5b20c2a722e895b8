use lokoboard_core::db::open_db_in_memory;
use lokoboard_core::{
    BoardService, BoardServiceError, Card, CardDraft, CardFields, CardType, ColumnId,
    SqliteBoardRepository,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> BoardService<SqliteBoardRepository<'_>> {
    BoardService::new(SqliteBoardRepository::try_new(conn).unwrap())
}

fn add_assistant(
    service: &BoardService<SqliteBoardRepository<'_>>,
    column_id: &str,
    sub_id: Option<&str>,
) -> Card {
    let draft = CardDraft {
        kind: CardType::Assistant,
        fields: CardFields {
            name: "Petrov P. P.".to_string(),
            code: "TN-7781".to_string(),
            position: Some("Assistant driver".to_string()),
            photo_url: Some("https://photos.example/petrov.jpg".to_string()),
        },
    };
    service.create_card(column_id, sub_id, &draft).unwrap()
}

fn column_ids(service: &BoardService<SqliteBoardRepository<'_>>) -> Vec<ColumnId> {
    service
        .list_columns()
        .unwrap()
        .into_iter()
        .map(|column| column.column_id)
        .collect()
}

#[test]
fn move_changes_only_placement() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let from = service.create_column("Rest").unwrap();
    let to = service.create_column("On duty").unwrap();
    let shift = service.create_subcolumn(&to.column_id, "Night").unwrap();
    let card = add_assistant(&service, &from.column_id, None);

    service
        .move_card(&card.id, &to.column_id, Some(&shift.sub_id))
        .unwrap();

    let moved = service.get_card(&card.id).unwrap().unwrap();
    assert_eq!(moved.column_id, to.column_id);
    assert_eq!(moved.sub_id.as_deref(), Some(shift.sub_id.as_str()));
    assert_eq!(
        Card {
            column_id: card.column_id.clone(),
            sub_id: card.sub_id.clone(),
            ..moved
        },
        card
    );
    assert!(service
        .list_cards_in(&from.column_id, None)
        .unwrap()
        .is_empty());
}

#[test]
fn move_back_to_direct_area_clears_subcolumn() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let column = service.create_column("On duty").unwrap();
    let shift = service.create_subcolumn(&column.column_id, "Day").unwrap();
    let card = add_assistant(&service, &column.column_id, Some(&shift.sub_id));

    service.move_card(&card.id, &column.column_id, None).unwrap();

    let moved = service.get_card(&card.id).unwrap().unwrap();
    assert!(moved.is_direct());
}

#[test]
fn move_of_deleted_card_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let column = service.create_column("On duty").unwrap();
    let card = add_assistant(&service, &column.column_id, None);
    service.delete_card(&card.id).unwrap();

    let err = service
        .move_card(&card.id, &column.column_id, None)
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::CardNotFound(id) if id == card.id));
}

#[test]
fn move_rejects_invalid_target_and_keeps_card() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let home = service.create_column("Rest").unwrap();
    let other = service.create_column("On duty").unwrap();
    let foreign = service.create_subcolumn(&other.column_id, "Night").unwrap();
    let card = add_assistant(&service, &home.column_id, None);

    let err = service
        .move_card(&card.id, "col-missing", None)
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::ColumnNotFound(_)));

    let err = service
        .move_card(&card.id, &home.column_id, Some("sub-missing"))
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::SubcolumnNotFound(_)));

    let err = service
        .move_card(&card.id, &home.column_id, Some(&foreign.sub_id))
        .unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::SubcolumnOutsideColumn { ref sub_id, ref column_id }
            if *sub_id == foreign.sub_id && *column_id == home.column_id
    ));

    assert_eq!(service.get_card(&card.id).unwrap().unwrap(), card);
}

#[test]
fn new_columns_append_to_the_end() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let a = service.create_column("A").unwrap();
    let b = service.create_column("B").unwrap();
    let c = service.create_column("C").unwrap();

    assert_eq!((a.order, b.order, c.order), (0, 1, 2));
    assert_eq!(column_ids(&service), vec![a.column_id, b.column_id, c.column_id]);
}

#[test]
fn reorder_persists_index_as_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let a = service.create_column("A").unwrap();
    let b = service.create_column("B").unwrap();
    let c = service.create_column("C").unwrap();

    let wanted = vec![c.column_id.clone(), a.column_id.clone(), b.column_id.clone()];
    service.reorder_columns(&wanted).unwrap();

    let columns = service.list_columns().unwrap();
    for (index, column) in columns.iter().enumerate() {
        assert_eq!(column.column_id, wanted[index]);
        assert_eq!(column.order, index as i64);
    }
}

#[test]
fn reorder_appends_unnamed_columns_in_previous_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let a = service.create_column("A").unwrap();
    let b = service.create_column("B").unwrap();
    let c = service.create_column("C").unwrap();

    service.reorder_columns(&[c.column_id.clone()]).unwrap();

    assert_eq!(column_ids(&service), vec![c.column_id, a.column_id, b.column_id]);
    let orders: Vec<i64> = service
        .list_columns()
        .unwrap()
        .iter()
        .map(|column| column.order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn reorder_rejects_unknown_or_duplicate_ids_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let a = service.create_column("A").unwrap();
    let b = service.create_column("B").unwrap();
    let before = column_ids(&service);

    let err = service
        .reorder_columns(&[b.column_id.clone(), "col-missing".to_string()])
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::ColumnNotFound(id) if id == "col-missing"));

    let err = service
        .reorder_columns(&[b.column_id.clone(), a.column_id.clone(), b.column_id.clone()])
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::DuplicateColumnInOrder(id) if id == b.column_id));

    assert_eq!(column_ids(&service), before);
}
