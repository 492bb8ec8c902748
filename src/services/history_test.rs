use super::*;

fn node(text: &str) -> MindMapNode {
    MindMapNode::new("root", text)
}

#[test]
fn record_prepends_and_assigns_id() {
    let mut store = HistoryStore::new();
    let first = store.record("alpha", 2, node("alpha"));
    let second = store.record("beta", 3, node("beta"));

    assert!(first.id.starts_with("history-"));
    assert_ne!(first.id, second.id);
    assert!(second.timestamp >= first.timestamp);

    let topics: Vec<&str> = store.list().iter().map(|i| i.topic.as_str()).collect();
    assert_eq!(topics, vec!["beta", "alpha"]);
}

#[test]
fn twenty_first_item_evicts_oldest() {
    let mut store = HistoryStore::new();
    for i in 0..HISTORY_CAP {
        store.record(&format!("topic-{i}"), 3, node("x"));
    }
    assert_eq!(store.len(), HISTORY_CAP);

    store.record("newest", 3, node("x"));
    assert_eq!(store.len(), HISTORY_CAP);
    assert_eq!(store.list()[0].topic, "newest");
    assert!(store.list().iter().all(|i| i.topic != "topic-0"));
    assert_eq!(store.list()[HISTORY_CAP - 1].topic, "topic-1");
}

#[test]
fn get_and_remove() {
    let mut store = HistoryStore::new();
    let item = store.record("alpha", 2, node("alpha"));

    assert_eq!(store.get(&item.id), Some(&item));
    assert!(store.get("history-missing").is_none());

    assert!(!store.remove("history-missing"));
    assert!(store.remove(&item.id));
    assert!(store.is_empty());
}

#[test]
fn clear_reports_count() {
    let mut store = HistoryStore::new();
    store.record("a", 1, node("a"));
    store.record("b", 1, node("b"));
    assert_eq!(store.clear(), 2);
    assert!(store.is_empty());
}

fn items(count: usize) -> Vec<HistoryItem> {
    (0..count).map(|i| HistoryItem::new(&format!("t{i}"), 1, node("x"))).collect()
}

#[test]
fn from_items_within_cap_starts_clean() {
    let store = HistoryStore::from_items(items(HISTORY_CAP));
    assert_eq!(store.len(), HISTORY_CAP);
    assert!(!store.is_dirty());
}

#[test]
fn from_items_over_cap_truncates_and_is_dirty() {
    let store = HistoryStore::from_items(items(HISTORY_CAP + 5));
    assert_eq!(store.len(), HISTORY_CAP);
    assert_eq!(store.list()[0].topic, "t0");
    assert!(store.is_dirty());
}

#[test]
fn dirty_tracking_follows_versions() {
    let mut store = HistoryStore::new();
    assert!(!store.is_dirty());

    store.record("a", 1, node("a"));
    assert!(store.is_dirty());

    let (version, items) = store.snapshot();
    assert_eq!(items.len(), 1);

    // Mutation lands while the snapshot is being written.
    store.record("b", 1, node("b"));
    store.mark_persisted(version);
    assert!(store.is_dirty());

    let (latest, _) = store.snapshot();
    store.mark_persisted(latest);
    assert!(!store.is_dirty());

    // A late ack for an older version does not regress.
    store.mark_persisted(version);
    assert!(!store.is_dirty());
}

#[test]
fn clearing_empty_store_does_not_dirty() {
    let mut store = HistoryStore::new();
    assert_eq!(store.clear(), 0);
    assert!(!store.is_dirty());
}

#[test]
fn failed_remove_does_not_dirty() {
    let mut store = HistoryStore::new();
    assert!(!store.remove("nope"));
    assert!(!store.is_dirty());
}

#[test]
fn item_serializes_with_nested_tree() {
    let item = HistoryItem {
        id: "history-1".into(),
        topic: "Rust".into(),
        depth: 2,
        timestamp: 1_700_000_000_000,
        data: MindMapNode::new("root", "Rust").with_children(vec![MindMapNode::new("a", "Ownership")]),
    };
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
    assert_eq!(json["data"]["children"][0]["text"], "Ownership");
}

#[test]
fn error_codes() {
    assert_eq!(HistoryError::NotFound("x".into()).error_code(), "E_HISTORY_NOT_FOUND");
    let io = HistoryError::Io(std::io::Error::other("disk"));
    assert!(io.retryable());
    assert_eq!(io.error_code(), "E_HISTORY_IO");
}

#[tokio::test]
async fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::load(&dir.path().join("nope.json")).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn load_corrupt_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    tokio::fs::write(&path, "{not json").await.unwrap();
    let err = HistoryStore::load(&path).await.unwrap_err();
    assert!(matches!(err, HistoryError::Corrupt(_)));
}
