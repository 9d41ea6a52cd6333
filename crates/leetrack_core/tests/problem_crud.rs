use chrono::{TimeZone, Utc};
use leetrack_core::db::open_db_in_memory;
use leetrack_core::{
    Difficulty, ProblemDraft, ProblemRepository, ProblemService, ProblemValidationError,
    RepoError, ReviewState, SqliteProblemRepository, TrackerError,
};
use rusqlite::Connection;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    let service = ProblemService::new(repo);
    let now = Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap();

    let draft = ProblemDraft::new("  Two   Sum ", "Array")
        .with_problem_number(1)
        .with_difficulty(Difficulty::Easy)
        .with_notes("hash map of complements");
    let created = service.create_problem_at(&draft, now).unwrap();

    assert!(created.id > 0);
    assert_eq!(created.title, "Two Sum");
    assert_eq!(created.topic, "Array");
    assert_eq!(created.problem_number, Some(1));
    assert_eq!(created.difficulty, Difficulty::Easy);
    assert_eq!(created.notes.as_deref(), Some("hash map of complements"));
    assert_eq!(created.review_state, ReviewState::Unreviewed);
    assert_eq!(created.next_review_at, None);
    assert_eq!(created.attempted_at, now.timestamp_millis());
    assert_eq!(created.created_at, now.timestamp_millis());
    assert_eq!(created.first_reviewed_at, None);

    let loaded = repo.get_problem(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn ids_are_unique_and_listing_follows_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    let service = ProblemService::new(repo);

    let first = service
        .create_problem(&ProblemDraft::new("Two Sum", "Array"))
        .unwrap();
    let second = service
        .create_problem(&ProblemDraft::new("Valid Parentheses", "Stack"))
        .unwrap();
    assert_ne!(first.id, second.id);

    let titles = repo
        .list_problems()
        .unwrap()
        .into_iter()
        .map(|problem| problem.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Two Sum", "Valid Parentheses"]);
}

#[test]
fn create_rejects_blank_title_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    let service = ProblemService::new(repo);

    let err = service
        .create_problem(&ProblemDraft::new("   ", "Array"))
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Validation(ProblemValidationError::EmptyTitle)
    ));
    assert!(repo.list_problems().unwrap().is_empty());
}

#[test]
fn update_notes_keeps_review_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    let service = ProblemService::new(repo);
    let created = service
        .create_problem(&ProblemDraft::new("Two Sum", "Array"))
        .unwrap();

    let updated = service
        .update_notes(created.id, Some("sort + two pointers also works"))
        .unwrap();
    assert_eq!(
        updated.notes.as_deref(),
        Some("sort + two pointers also works")
    );
    assert_eq!(updated.review_state, ReviewState::Unreviewed);
    assert_eq!(updated.next_review_at, created.next_review_at);

    let cleared = service.update_notes(created.id, Some("  ")).unwrap();
    assert_eq!(cleared.notes, None);
}

#[test]
fn update_notes_on_missing_problem_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    let service = ProblemService::new(repo);

    let err = service.update_notes(42, Some("nothing")).unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(42)));
}

#[test]
fn delete_removes_the_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    let service = ProblemService::new(repo);
    let created = service
        .create_problem(&ProblemDraft::new("Two Sum", "Array"))
        .unwrap();

    service.delete_problem(created.id).unwrap();
    assert!(repo.get_problem(created.id).unwrap().is_none());

    let err = service.delete_problem(created.id).unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(id) if id == created.id));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteProblemRepository::try_new(&conn).unwrap_err();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn try_new_rejects_missing_column() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("ALTER TABLE problems DROP COLUMN mastered_at;")
        .unwrap();

    let err = SqliteProblemRepository::try_new(&conn).unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "problems",
            column: "mastered_at"
        }
    ));
}

#[test]
fn corrupt_schedule_rows_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProblemRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO problems (title, topic, review_state, next_review_at, attempted_at, created_at, updated_at)
         VALUES ('Two Sum', 'Array', 'mastered', 5, 1, 1, 1);",
        [],
    )
    .unwrap();

    let err = repo.list_problems().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
