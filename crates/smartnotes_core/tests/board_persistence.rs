use smartnotes_core::db::open_db;
use smartnotes_core::{
    BoardSnapshot, FixedPrompt, MemoryStore, Note, NoteBoard, SequentialIdGenerator,
    SqliteKvStore, StorageKeys, Todo,
};

#[test]
fn every_mutation_overwrites_its_collection_key() {
    let mut board = NoteBoard::load(
        MemoryStore::new(),
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
    );

    board.add_category("Work").unwrap();
    assert_eq!(
        board.store().value("sn-categories"),
        Some(r#"["General","Work"]"#)
    );

    board.set_note_draft("plan");
    board.select_category("Work");
    board.save_note();
    assert_eq!(
        board.store().value("sn-notes"),
        Some(r#"[{"id":1,"text":"plan","category":"Work"}]"#)
    );

    board.set_todo_draft("call");
    board.save_todo();
    board.toggle_done(2);
    assert_eq!(
        board.store().value("sn-todos"),
        Some(r#"[{"id":2,"text":"call","done":true}]"#)
    );

    board.delete_category("Work").unwrap();
    assert_eq!(board.store().value("sn-notes"), Some("[]"));
    assert_eq!(board.store().value("sn-categories"), Some(r#"["General"]"#));
}

#[test]
fn reload_reproduces_equal_state() {
    let mut board = NoteBoard::load(
        MemoryStore::new(),
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
    );
    board.add_category("Home").unwrap();
    board.set_note_draft("paint fence");
    board.select_category("Home");
    board.save_note();
    board.set_note_draft("read");
    board.save_note();
    board.set_todo_draft("taxes");
    board.save_todo();
    board.toggle_done(3);
    board.toggle_theme();

    let before = board.state().snapshot();
    let (store, _, _) = board.into_parts();
    let reloaded = NoteBoard::load(
        store,
        FixedPrompt::accept_all(),
        SequentialIdGenerator::starting_at(100),
    );
    assert_eq!(reloaded.state().snapshot(), before);
}

#[test]
fn missing_and_malformed_payloads_load_defaults() {
    let store = MemoryStore::with_entries([
        ("sn-notes", "not json"),
        ("sn-darkMode", "\"yes\""),
    ]);
    let board = NoteBoard::load(
        store,
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
    );
    assert_eq!(board.state().snapshot(), BoardSnapshot::default());
}

#[test]
fn load_repairs_inconsistent_payloads_and_writes_them_back() {
    let store = MemoryStore::with_entries([
        ("sn-categories", r#"["Work","Work"]"#),
        (
            "sn-notes",
            r#"[{"id":1,"text":" lost ","category":"Archive"},{"id":2,"text":"ok","category":"Work"}]"#,
        ),
    ]);
    let board = NoteBoard::load(
        store,
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
    );

    let state = board.state();
    assert_eq!(state.categories, vec!["General", "Work"]);
    assert_eq!(
        state.notes,
        vec![Note::new(1, "lost", "General"), Note::new(2, "ok", "Work")]
    );
    assert_eq!(
        board.store().value("sn-categories"),
        Some(r#"["General","Work"]"#)
    );
}

#[test]
fn custom_keys_isolate_boards_in_one_store() {
    let mut work = NoteBoard::load_with_keys(
        MemoryStore::new(),
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
        StorageKeys::with_prefix("work-"),
    );
    work.set_todo_draft("ship");
    work.save_todo();

    let (store, _, _) = work.into_parts();
    assert!(store.value("work-todos").is_some());
    assert_eq!(store.value("sn-todos"), None);

    let default_board = NoteBoard::load(
        store,
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
    );
    assert!(default_board.state().todos.is_empty());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smartnotes.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut board = NoteBoard::load(
            SqliteKvStore::new(&conn),
            FixedPrompt::accept_all(),
            SequentialIdGenerator::default(),
        );
        board.set_todo_draft("persist me");
        board.save_todo();
        board.toggle_theme();
    }

    let conn = open_db(&path).unwrap();
    let board = NoteBoard::load(
        SqliteKvStore::new(&conn),
        FixedPrompt::accept_all(),
        SequentialIdGenerator::default(),
    );
    assert_eq!(board.state().todos, vec![Todo::new(1, "persist me")]);
    assert!(board.state().dark_mode);
}
