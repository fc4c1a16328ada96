use crushlog_core::db::open_db_in_memory;
use crushlog_core::{
    BlobRepository, CrushStore, SqliteBlobRepository, StoreError, BACKUP_KEY, PRIMARY_KEY,
};
use serde_json::{json, Value};

fn record(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mistakes": 0,
        "pros": [],
        "cons": [],
        "createdAt": "2026-08-29T12:00:00.000Z"
    })
}

#[test]
fn load_on_fresh_store_returns_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_load_round_trips_valid_records() {
    let conn = open_db_in_memory().unwrap();
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    let saved = store
        .save(&json!([record("1", "Alice"), record("2", "Bob")]))
        .unwrap();
    assert_eq!(saved, 2);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].name, "Alice");
    assert_eq!(loaded[1].name, "Bob");
}

#[test]
fn save_rejects_non_array_input() {
    let conn = open_db_in_memory().unwrap();
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    for candidate in [json!({"id": "1"}), json!("records"), json!(null)] {
        assert!(matches!(store.save(&candidate), Err(StoreError::Input)));
    }
}

#[test]
fn save_silently_drops_invalid_records() {
    let conn = open_db_in_memory().unwrap();
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    let mut broken = record("3", "Mallory");
    broken["mistakes"] = json!(6);
    let saved = store
        .save(&json!([record("1", "Alice"), broken]))
        .unwrap();
    assert_eq!(saved, 1);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "1");
}

#[test]
fn save_snapshots_previous_primary_to_backup() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    store.save(&json!([record("1", "Alice")])).unwrap();
    let first_blob = repo.read_blob(PRIMARY_KEY).unwrap().unwrap();

    store.save(&json!([record("2", "Bob")])).unwrap();
    assert_eq!(repo.read_blob(BACKUP_KEY).unwrap().unwrap(), first_blob);
}

#[test]
fn load_falls_back_to_backup_when_primary_is_corrupt() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    let backup = serde_json::to_string(&json!([record("7", "Backup")])).unwrap();
    repo.write_blob(PRIMARY_KEY, "{ invalid json }").unwrap();
    repo.write_blob(BACKUP_KEY, &backup).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "7");
}

#[test]
fn load_returns_empty_when_both_slots_are_corrupt() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    repo.write_blob(PRIMARY_KEY, "{ invalid json }").unwrap();
    repo.write_blob(BACKUP_KEY, "also not json").unwrap();

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn non_array_primary_payload_counts_as_corrupt() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    repo.write_blob(PRIMARY_KEY, "{\"not\": \"an array\"}")
        .unwrap();

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn load_self_heals_primary_after_dropping_invalid_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    let mut broken = record("2", "Broken");
    broken["name"] = json!("");
    let dirty = serde_json::to_string(&json!([record("1", "Kept"), broken])).unwrap();
    repo.write_blob(PRIMARY_KEY, &dirty).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);

    let healed: Vec<Value> =
        serde_json::from_str(&repo.read_blob(PRIMARY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(healed.len(), 1);
    assert_eq!(healed[0]["id"], json!("1"));

    // Pre-heal payload was snapshotted before the rewrite.
    assert_eq!(repo.read_blob(BACKUP_KEY).unwrap().unwrap(), dirty);
}

#[test]
fn oversized_save_fails_with_capacity_and_leaves_primary_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    store.save(&json!([record("1", "Alice")])).unwrap();
    let before = repo.read_blob(PRIMARY_KEY).unwrap().unwrap();

    let oversized: Vec<Value> = (0..5000)
        .map(|i| {
            let mut item = record(&format!("id-{i}"), "N");
            item["description"] = json!("d".repeat(500));
            item
        })
        .collect();

    let err = store.save(&Value::Array(oversized)).unwrap_err();
    assert!(matches!(err, StoreError::Capacity { bytes, limit }
        if bytes > limit && limit == crushlog_core::MAX_PAYLOAD_BYTES));
    assert_eq!(repo.read_blob(PRIMARY_KEY).unwrap().unwrap(), before);
}

#[test]
fn clear_removes_primary_and_keeps_a_backup_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::new(&conn);
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    store.save(&json!([record("1", "Alice")])).unwrap();
    let payload = repo.read_blob(PRIMARY_KEY).unwrap().unwrap();

    store.clear().unwrap();
    assert!(repo.read_blob(PRIMARY_KEY).unwrap().is_none());
    assert_eq!(repo.read_blob(BACKUP_KEY).unwrap().unwrap(), payload);

    // A cleared store is empty; the backup must not resurrect data.
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn clear_on_empty_store_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = CrushStore::new(SqliteBlobRepository::new(&conn));

    store.clear().unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_empty());
}
