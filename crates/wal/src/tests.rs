use super::*;
use tempfile::tempdir;

#[test]
fn append_and_replay_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let log = AppendLog::instance(&path).unwrap();
    log.append("chris", "lessard").unwrap();
    log.append("chris", "hemsworth").unwrap();

    let records = log.replay().unwrap();
    assert_eq!(
        records,
        vec![
            ("chris".to_string(), "lessard".to_string()),
            ("chris".to_string(), "hemsworth".to_string()),
        ]
    );
}

#[test]
fn instance_is_singleton_per_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.log");
    let a = AppendLog::instance(&path).unwrap();
    let b = AppendLog::instance(&path).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn distinct_paths_get_distinct_instances() {
    let dir = tempdir().unwrap();
    let a = AppendLog::instance(dir.path().join("a.log")).unwrap();
    let b = AppendLog::instance(dir.path().join("b.log")).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn clear_empties_the_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let log = AppendLog::instance(&path).unwrap();
    log.append("a", "1").unwrap();
    log.append("b", "2").unwrap();
    log.clear().unwrap();
    assert!(log.replay().unwrap().is_empty());
}

#[test]
fn append_after_clear_is_visible() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let log = AppendLog::instance(&path).unwrap();
    log.append("a", "1").unwrap();
    log.clear().unwrap();
    log.append("sad", "mad").unwrap();
    log.append("pad", "tad").unwrap();
    let records = log.replay().unwrap();
    assert_eq!(
        records,
        vec![
            ("sad".to_string(), "mad".to_string()),
            ("pad".to_string(), "tad".to_string()),
        ]
    );
}

#[test]
fn replay_of_fresh_log_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.log");
    let log = AppendLog::instance(&path).unwrap();
    assert!(log.replay().unwrap().is_empty());
}

#[test]
fn two_set_calls_produce_two_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let log = AppendLog::instance(&path).unwrap();
    log.clear().unwrap();
    log.append("k1", "v1").unwrap();
    log.append("k2", "v2").unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}
