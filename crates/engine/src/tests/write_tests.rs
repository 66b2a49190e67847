use super::helpers;

#[test]
fn flush_triggers_before_the_insert_that_would_cross_threshold() {
    // threshold=10: "1"+"test1" (6 bytes) fits; adding "2"+"test2" (6 more)
    // would bring the memtable to 12, so the first pair flushes on its own
    // before the second is ever inserted.
    let mut h = helpers::open("segment", 10, 2);

    h.engine.set("1", "test1").unwrap();
    h.engine.set("2", "test2").unwrap();

    assert_eq!(h.engine.segments(), &["segment-1".to_string()]);
    assert_eq!(h.engine.current_segment(), "segment-2");

    let segment_path = helpers::segment_dir(&h.dir).join("segment-1");
    let contents = std::fs::read_to_string(segment_path).unwrap();
    assert_eq!(contents, "1,test1\n");

    assert_eq!(h.engine.get("2").unwrap(), Some("test2".to_string()));
    assert_eq!(h.engine.get("1").unwrap(), Some("test1".to_string()));
}

#[test]
fn flush_on_empty_memtable_is_a_noop() {
    let mut h = helpers::open("segment", 100, 10);
    h.engine.flush().unwrap();
    assert!(h.engine.segments().is_empty());
    assert_eq!(h.engine.current_segment(), "segment-1");
}

#[test]
fn set_rejects_empty_and_separator_bearing_fields() {
    let mut h = helpers::open("segment", 100, 10);
    assert!(h.engine.set("", "v").is_err());
    assert!(h.engine.set("k", "").is_err());
    assert!(h.engine.set("k,bad", "v").is_err());
    assert!(h.engine.set("k", "v\nbad").is_err());
}

#[test]
fn repeated_flushes_rotate_segment_ids_sequentially() {
    let mut h = helpers::open("segment", 10, 2);

    h.engine.set("abc", "cba").unwrap(); // 6 bytes
    h.engine.set("def", "fed").unwrap(); // crosses threshold, flushes abc -> segment-1
    assert_eq!(h.engine.current_segment(), "segment-2");

    h.engine.set("ghi", "ihg").unwrap(); // crosses threshold, flushes def -> segment-2
    assert_eq!(h.engine.current_segment(), "segment-3");
    assert_eq!(
        h.engine.segments(),
        &["segment-1".to_string(), "segment-2".to_string()]
    );
}

#[test]
fn updating_an_existing_key_checks_the_value_delta_not_the_full_size() {
    let mut h = helpers::open("segment", 12, 2);

    h.engine.set("k", "short").unwrap(); // total_bytes = 1 + 5 = 6
    h.engine.set("k", "longer").unwrap(); // update: delta +1 -> total_bytes = 7, below 12

    assert!(h.engine.segments().is_empty());
    assert_eq!(h.engine.get("k").unwrap(), Some("longer".to_string()));
}
