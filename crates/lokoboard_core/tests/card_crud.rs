use lokoboard_core::db::open_db_in_memory;
use lokoboard_core::{
    BoardService, BoardServiceError, CardDraft, CardFields, CardRepository, CardType,
    CardValidationError, RepoError, SqliteBoardRepository,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn service(conn: &Connection) -> BoardService<SqliteBoardRepository<'_>> {
    BoardService::new(SqliteBoardRepository::try_new(conn).unwrap())
}

fn engineer_draft() -> CardDraft {
    CardDraft {
        kind: CardType::Engineer,
        fields: CardFields {
            name: "Ivanov I. I.".to_string(),
            code: "TN-0042".to_string(),
            position: Some("Driver, 1st class".to_string()),
            photo_url: Some("https://photos.example/ivanov.jpg".to_string()),
        },
    }
}

#[test]
fn create_and_get_roundtrip_preserves_every_field() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Freight").unwrap();
    let sub = service.create_subcolumn(&column.column_id, "Shift A").unwrap();

    let created = service
        .create_card(&column.column_id, Some(&sub.sub_id), &engineer_draft())
        .unwrap();
    let loaded = service.get_card(&created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert!(loaded.id.starts_with("eng-"));
    assert_eq!(loaded.kind, CardType::Engineer);
    assert_eq!(loaded.name, "Ivanov I. I.");
    assert_eq!(loaded.code, "TN-0042");
    assert_eq!(loaded.position.as_deref(), Some("Driver, 1st class"));
    assert_eq!(
        loaded.photo_url.as_deref(),
        Some("https://photos.example/ivanov.jpg")
    );
    assert_eq!(loaded.column_id, column.column_id);
    assert_eq!(loaded.sub_id.as_deref(), Some(sub.sub_id.as_str()));
}

#[test]
fn locomotive_card_roundtrip_without_optional_fields() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Shunting").unwrap();

    let draft = CardDraft {
        kind: CardType::Locomotive,
        fields: CardFields {
            name: "TEM2".to_string(),
            code: "TEM2-1187".to_string(),
            position: None,
            photo_url: None,
        },
    };
    let created = service
        .create_card(&column.column_id, None, &draft)
        .unwrap();
    let loaded = service.get_card(&created.id).unwrap().unwrap();

    assert!(loaded.id.starts_with("loco-"));
    assert_eq!(loaded.position, None);
    assert_eq!(loaded.photo_url, None);
    assert!(loaded.is_direct());
}

#[test]
fn create_rejects_invalid_draft_without_writing() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Freight").unwrap();

    let mut draft = engineer_draft();
    draft.fields.position = None;
    let err = service
        .create_card(&column.column_id, None, &draft)
        .unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::InvalidCard(CardValidationError::MissingPosition(CardType::Engineer))
    ));
    assert!(service.list_all_cards().unwrap().is_empty());
}

#[test]
fn create_rejects_missing_column_and_foreign_subcolumn() {
    let conn = setup();
    let service = service(&conn);
    let column_a = service.create_column("A").unwrap();
    let column_b = service.create_column("B").unwrap();
    let sub_b = service.create_subcolumn(&column_b.column_id, "B1").unwrap();

    let err = service
        .create_card("col-missing", None, &engineer_draft())
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::ColumnNotFound(id) if id == "col-missing"));

    let err = service
        .create_card(&column_a.column_id, Some(&sub_b.sub_id), &engineer_draft())
        .unwrap_err();
    assert!(matches!(err, BoardServiceError::SubcolumnOutsideColumn { .. }));
}

#[test]
fn schema_rejects_subcolumn_of_another_column_even_below_service() {
    let conn = setup();
    let service = service(&conn);
    let column_a = service.create_column("A").unwrap();
    let column_b = service.create_column("B").unwrap();
    let sub_b = service.create_subcolumn(&column_b.column_id, "B1").unwrap();
    let card = service
        .create_card(&column_a.column_id, None, &engineer_draft())
        .unwrap();

    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    let err = repo
        .move_card(&card.id, &column_a.column_id, Some(&sub_b.sub_id))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn update_card_changes_content_but_not_placement() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Freight").unwrap();
    let created = service
        .create_card(&column.column_id, None, &engineer_draft())
        .unwrap();

    let updated = service
        .update_card(
            &created.id,
            &CardFields {
                name: "Ivanov I. P.".to_string(),
                code: "TN-0043".to_string(),
                position: Some("Instructor".to_string()),
                photo_url: None,
            },
        )
        .unwrap();

    let loaded = service.get_card(&created.id).unwrap().unwrap();
    assert_eq!(loaded, updated);
    assert_eq!(loaded.name, "Ivanov I. P.");
    assert_eq!(loaded.code, "TN-0043");
    assert_eq!(loaded.position.as_deref(), Some("Instructor"));
    assert_eq!(loaded.photo_url, None);
    assert_eq!(loaded.kind, created.kind);
    assert_eq!(loaded.column_id, created.column_id);
    assert_eq!(loaded.sub_id, created.sub_id);
}

#[test]
fn update_and_delete_missing_card_report_not_found() {
    let conn = setup();
    let service = service(&conn);

    let fields = engineer_draft().fields;
    let err = service.update_card("eng-missing", &fields).unwrap_err();
    assert!(matches!(err, BoardServiceError::CardNotFound(id) if id == "eng-missing"));

    let err = service.delete_card("eng-missing").unwrap_err();
    assert!(matches!(err, BoardServiceError::CardNotFound(id) if id == "eng-missing"));
}

#[test]
fn delete_card_removes_only_that_card() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Freight").unwrap();
    let first = service
        .create_card(&column.column_id, None, &engineer_draft())
        .unwrap();
    let second = service
        .create_card(&column.column_id, None, &engineer_draft())
        .unwrap();

    service.delete_card(&first.id).unwrap();

    assert!(service.get_card(&first.id).unwrap().is_none());
    let remaining = service.list_cards_in(&column.column_id, None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
}

#[test]
fn read_rejects_corrupted_card_type() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Freight").unwrap();
    let card = service
        .create_card(&column.column_id, None, &engineer_draft())
        .unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute("UPDATE cards SET type = 'tender' WHERE id = ?1;", [&card.id])
        .unwrap();

    let err = service.get_card(&card.id).unwrap_err();
    assert!(matches!(err, BoardServiceError::Repo(RepoError::InvalidData(_))));
}

#[test]
fn card_serializes_with_stored_record_keys() {
    let conn = setup();
    let service = service(&conn);
    let column = service.create_column("Freight").unwrap();
    let card = service
        .create_card(&column.column_id, None, &engineer_draft())
        .unwrap();

    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["type"], "engineer");
    assert_eq!(json["columnId"], column.column_id.as_str());
    assert_eq!(json["subId"], serde_json::Value::Null);
    assert_eq!(json["photoUrl"], "https://photos.example/ivanov.jpg");
}
