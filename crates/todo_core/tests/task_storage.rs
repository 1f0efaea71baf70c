use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use std::error::Error;
use todo_core::{
    JsonTaskRepository, Priority, RecordError, RepoError, StoreConfig, Task, TaskRepository,
    TaskValidationError, MAX_TASK_ID,
};

fn repo_in(dir: &TempDir) -> JsonTaskRepository {
    JsonTaskRepository::new(dir.path().join("tasks.json"))
}

fn make_task(id: u64) -> Task {
    let mut task = Task::new(id, format!("Task {id}")).unwrap();
    task.due_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(17, 45, 0);
    task.tags = vec!["test".to_string()];
    task
}

#[test]
fn save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    let mut second = make_task(2);
    second.priority = Priority::High;
    second.completed = true;
    second.tags = vec!["Work".to_string(), "naïve ✓".to_string()];
    let tasks = vec![make_task(1), second];

    repo.save_all(&tasks).unwrap();
    assert!(repo.path().exists());

    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded.len(), 2);
    for (loaded, original) in loaded.iter().zip(&tasks) {
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.title, original.title);
        assert_eq!(loaded.priority, original.priority);
        assert_eq!(loaded.tags, original.tags);
        assert_eq!(loaded.completed, original.completed);
        assert_eq!(loaded.created_at, original.created_at);
        // due dates are stored with day precision
        assert_eq!(
            loaded.due_date.map(|due| due.date()),
            original.due_date.map(|due| due.date())
        );
    }
}

#[test]
fn saved_file_is_four_space_json_array_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.save_all(&[make_task(3), make_task(1)]).unwrap();

    let raw = fs::read_to_string(repo.path()).unwrap();
    assert!(raw.starts_with("[\n    {\n        \"id\": 3,"));

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let ids: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(value[0]["due_date"], "2025-01-01");
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("nested/data/tasks.json"), dir.path());
    let repo = JsonTaskRepository::from_config(&config);

    repo.save_all(&[make_task(1)]).unwrap();
    assert!(config.data_file.exists());
    assert!(!dir.path().join("nested/data/tasks.json.tmp").exists());
}

#[test]
fn save_replaces_whole_collection() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    repo.save_all(&[make_task(1), make_task(2), make_task(3)]).unwrap();
    repo.save_all(&[make_task(2)]).unwrap();

    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, 2);
}

#[test]
fn save_rejects_invalid_task_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.save_all(&[make_task(1)]).unwrap();

    let mut broken = make_task(2);
    broken.title.clear();
    let err = repo.save_all(&[make_task(1), broken]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.load_all().unwrap().len(), 1);
}

#[test]
fn load_missing_file_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonTaskRepository::new(dir.path().join("no_file.json"));
    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn load_empty_array_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    fs::write(repo.path(), "[]").unwrap();
    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn load_malformed_file_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    fs::write(repo.path(), "{ this is not json").unwrap();
    assert!(repo.load_all().unwrap().is_empty());

    fs::write(repo.path(), "").unwrap();
    assert!(repo.load_all().unwrap().is_empty());

    fs::write(repo.path(), r#"{"id": 1, "title": "object, not array"}"#).unwrap();
    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn load_fails_on_invalid_record_inside_valid_array() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    fs::write(
        repo.path(),
        r#"[{"id": 1, "title": "ok"}, {"id": 2, "title": "bad", "priority": "urgent"}]"#,
    )
    .unwrap();

    let err = repo.load_all().unwrap_err();
    assert!(err.source().is_some());
    assert!(err.to_string().contains("record #1"), "unexpected message: {err}");
    match err {
        RepoError::InvalidRecord {
            index: 1,
            source: RecordError::Validation(TaskValidationError::InvalidPriority(value)),
        } => assert_eq!(value, "urgent"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_reports_wrongly_typed_field_as_invalid_record() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    fs::write(repo.path(), r#"[{"id": "one", "title": "typed wrong"}]"#).unwrap();

    assert!(matches!(
        repo.load_all().unwrap_err(),
        RepoError::InvalidRecord {
            index: 0,
            source: RecordError::Decode(_),
        }
    ));
}

#[test]
fn save_rejects_ids_beyond_the_storable_range() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    let mut task = make_task(1);
    task.id = MAX_TASK_ID + 1;

    let err = repo.save_all(&[make_task(2), task]).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::IdOutOfRange(id)) if id == MAX_TASK_ID + 1
    ));
    assert!(!repo.path().exists());
}

#[test]
fn next_id_fails_once_the_largest_id_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    fs::write(
        repo.path(),
        format!(r#"[{{"id": {MAX_TASK_ID}, "title": "last id"}}]"#),
    )
    .unwrap();

    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded[0].id, MAX_TASK_ID);
    assert!(matches!(
        repo.next_id().unwrap_err(),
        RepoError::IdsExhausted { max } if max == MAX_TASK_ID
    ));
}

#[test]
fn load_accepts_records_with_missing_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    fs::write(repo.path(), r#"[{"id": 9, "title": "minimal", "tags": null}]"#).unwrap();

    let loaded = repo.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].priority, Priority::Medium);
    assert!(loaded[0].tags.is_empty());
    assert!(!loaded[0].completed);
}

#[test]
fn next_id_increments_from_max() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.save_all(&[make_task(1), make_task(2), make_task(10)]).unwrap();
    assert_eq!(repo.next_id().unwrap(), 11);

    let mut tasks = repo.load_all().unwrap();
    tasks.push(make_task(11));
    repo.save_all(&tasks).unwrap();
    assert_eq!(repo.next_id().unwrap(), 12);
}

#[test]
fn next_id_is_one_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    assert_eq!(repo.next_id().unwrap(), 1);

    repo.save_all(&[]).unwrap();
    assert_eq!(repo.next_id().unwrap(), 1);
}

#[test]
fn get_by_id_returns_first_match_or_none() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.save_all(&[make_task(1), make_task(2)]).unwrap();

    let found = repo.get_by_id(2).unwrap().unwrap();
    assert_eq!(found.id, 2);
    assert!(repo.get_by_id(99).unwrap().is_none());
}
