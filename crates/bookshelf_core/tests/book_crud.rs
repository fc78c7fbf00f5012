use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    Book, BookField, BookRepository, BookService, BookUpdate, BookValidationError, NewBook,
    ReadingStatus, RepoError, SqliteBookRepository,
};
use rusqlite::Connection;

fn solitude() -> NewBook {
    NewBook::new(
        "Cien años de soledad",
        "García Márquez",
        Some("Novela".to_string()),
        ReadingStatus::Unread,
    )
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo.create_book(&solitude()).unwrap();
    assert_eq!(created.id, 1);

    let loaded = repo.get_book(created.id).unwrap().unwrap();
    assert_eq!(
        loaded,
        Book {
            id: 1,
            title: "Cien años de soledad".to_string(),
            author: "García Márquez".to_string(),
            genre: Some("Novela".to_string()),
            status: ReadingStatus::Unread,
        }
    );
}

#[test]
fn create_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.create_book(&solitude()).unwrap();
    let second = repo
        .create_book(&NewBook::new("Ficciones", "Borges", None, ReadingStatus::Read))
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(second.genre, None);
}

#[test]
fn create_trims_fields_and_drops_blank_genre() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo
        .create_book(&NewBook::new(
            "  Rayuela ",
            " Cortázar",
            Some("   ".to_string()),
            ReadingStatus::Read,
        ))
        .unwrap();

    assert_eq!(created.title, "Rayuela");
    assert_eq!(created.author, "Cortázar");
    assert_eq!(created.genre, None);
}

#[test]
fn duplicate_title_and_author_is_rejected_and_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.create_book(&solitude()).unwrap();
    let err = repo.create_book(&solitude()).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Duplicate { ref title, ref author }
            if title == "Cien años de soledad" && author == "García Márquez"
    ));
    assert_eq!(repo.list_books().unwrap().len(), 1);
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo
        .create_book(&NewBook::new(" ", "Someone", None, ReadingStatus::Read))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BookValidationError::EmptyTitle)
    ));

    let long_genre = "x".repeat(101);
    let err = repo
        .create_book(&NewBook::new(
            "Title",
            "Author",
            Some(long_genre),
            ReadingStatus::Read,
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BookValidationError::TooLong {
            field: BookField::Genre,
            max_chars: 100
        })
    ));

    assert!(repo.list_books().unwrap().is_empty());
}

#[test]
fn list_is_ordered_by_title_regardless_of_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    for title in ["Ulysses", "Beloved", "Middlemarch", "Austerlitz"] {
        repo.create_book(&NewBook::new(title, "Author", None, ReadingStatus::Unread))
            .unwrap();
    }

    let titles: Vec<String> = repo
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, ["Austerlitz", "Beloved", "Middlemarch", "Ulysses"]);
}

#[test]
fn update_changes_only_the_selected_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    let updated = repo
        .update_book(created.id, &BookUpdate::Status(ReadingStatus::Read))
        .unwrap();
    assert_eq!(updated.status, ReadingStatus::Read);

    let loaded = repo.get_book(created.id).unwrap().unwrap();
    assert_eq!(loaded.status, ReadingStatus::Read);
    assert_eq!(loaded.title, created.title);
    assert_eq!(loaded.author, created.author);
    assert_eq!(loaded.genre, created.genre);
}

#[test]
fn update_each_text_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    repo.update_book(created.id, &BookUpdate::Title("El otoño del patriarca".to_string()))
        .unwrap();
    repo.update_book(created.id, &BookUpdate::Author("Gabriel García Márquez".to_string()))
        .unwrap();
    repo.update_book(created.id, &BookUpdate::Genre(None)).unwrap();

    let loaded = repo.get_book(created.id).unwrap().unwrap();
    assert_eq!(loaded.title, "El otoño del patriarca");
    assert_eq!(loaded.author, "Gabriel García Márquez");
    assert_eq!(loaded.genre, None);
    assert_eq!(loaded.status, ReadingStatus::Unread);
}

#[test]
fn update_with_same_value_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    let updated = repo
        .update_book(created.id, &BookUpdate::Status(ReadingStatus::Unread))
        .unwrap();
    assert_eq!(updated, created);
}

#[test]
fn update_validation_failure_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    let err = repo
        .update_book(created.id, &BookUpdate::Author("   ".to_string()))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BookValidationError::EmptyAuthor)
    ));
    assert_eq!(repo.get_book(created.id).unwrap().unwrap(), created);
}

#[test]
fn update_into_duplicate_rolls_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let first = repo
        .create_book(&NewBook::new("Emma", "Jane Austen", None, ReadingStatus::Read))
        .unwrap();
    let second = repo
        .create_book(&NewBook::new("Persuasion", "Jane Austen", None, ReadingStatus::Unread))
        .unwrap();

    let err = repo
        .update_book(second.id, &BookUpdate::Title("Emma".to_string()))
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate { .. }));

    assert_eq!(repo.get_book(second.id).unwrap().unwrap(), second);
    assert_eq!(repo.get_book(first.id).unwrap().unwrap(), first);

    // The connection is usable again after the rollback.
    repo.update_book(second.id, &BookUpdate::Title("Sanditon".to_string()))
        .unwrap();
}

#[test]
fn update_missing_id_returns_not_found_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    let err = repo
        .update_book(42, &BookUpdate::Status(ReadingStatus::Read))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
    assert_eq!(repo.list_books().unwrap(), vec![created]);
}

#[test]
fn delete_removes_record_permanently() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    repo.delete_book(created.id).unwrap();

    assert!(repo.get_book(created.id).unwrap().is_none());
    let err = repo.delete_book(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn delete_missing_id_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let created = repo.create_book(&solitude()).unwrap();

    assert!(matches!(repo.delete_book(7), Err(RepoError::NotFound(7))));
    assert_eq!(repo.list_books().unwrap(), vec![created]);
}

#[test]
fn service_walks_full_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let service = BookService::new(repo);

    let created = service.add_book(&solitude()).unwrap();
    assert_eq!(created.id, 1);
    assert!(service.book_exists(1).unwrap());

    let hits = service.search_books("garcía").unwrap();
    assert_eq!(hits, vec![created.clone()]);

    service
        .update_book(1, &BookUpdate::Status(ReadingStatus::Read))
        .unwrap();
    assert_eq!(service.get_book(1).unwrap().status, ReadingStatus::Read);

    service.delete_book(1).unwrap();
    assert!(matches!(service.get_book(1), Err(RepoError::NotFound(1))));
    assert!(!service.book_exists(1).unwrap());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        bookshelf_core::db::migrations::latest_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteBookRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("books"))
    ));
}
