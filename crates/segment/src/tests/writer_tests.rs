use std::collections::HashSet;
use tempfile::tempdir;

use crate::reader::read_records;
use crate::writer::{delete_keys, write_segment, IndexSample};

#[test]
fn write_segment_produces_sorted_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test_file-1");
    let records = vec![("1", "test1"), ("2", "test2"), ("3", "cl")];
    write_segment(&path, 0, records.into_iter()).unwrap();

    let contents = read_records(&path).unwrap();
    assert_eq!(
        contents,
        vec![
            ("1".to_string(), "test1".to_string()),
            ("2".to_string(), "test2".to_string()),
            ("3".to_string(), "cl".to_string()),
        ]
    );
}

#[test]
fn write_segment_samples_every_sparsity_th_record_by_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("segment-1");
    // 8 records, 3-char keys + 3-char values -> 8 bytes per record.
    let records = vec![
        ("abc", "123"),
        ("def", "456"),
        ("ghi", "789"),
        ("jkl", "012"),
        ("mno", "345"),
        ("pqr", "678"),
        ("stu", "901"),
        ("vwx", "234"),
    ];
    let samples = write_segment(&path, 4, records.into_iter()).unwrap();

    assert_eq!(
        samples,
        vec![
            IndexSample {
                key: "jkl".to_string(),
                offset: 24,
            },
            IndexSample {
                key: "vwx".to_string(),
                offset: 56,
            },
        ]
    );
}

#[test]
fn write_segment_offsets_point_at_correct_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("segment-1");
    let records = vec![
        ("abc", "123"),
        ("def", "456"),
        ("ghi", "789"),
        ("jkl", "012"),
        ("mno", "345"),
        ("pqr", "678"),
        ("stu", "901"),
        ("vwx", "234"),
    ];
    write_segment(&path, 4, records.into_iter()).unwrap();

    assert_eq!(
        crate::reader::get_from_offset(&path, 24, "jkl").unwrap(),
        Some("012".to_string())
    );
    assert_eq!(
        crate::reader::get_from_offset(&path, 56, "vwx").unwrap(),
        Some("234".to_string())
    );
}

#[test]
fn write_segment_with_variable_length_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("segment-1");
    // "red,1\n" = 6 bytes, "blue,2\n" = 7 bytes.
    let records = vec![("red", "1"), ("blue", "2"), ("green", "3"), ("purple", "4")];
    let samples = write_segment(&path, 2, records.into_iter()).unwrap();
    assert_eq!(samples[0].key, "blue");
    assert_eq!(samples[0].offset, 6);
}

#[test]
fn write_segment_zero_sparsity_samples_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("segment-1");
    let samples = write_segment(&path, 0, vec![("a", "1"), ("b", "2")].into_iter()).unwrap();
    assert!(samples.is_empty());
}

#[test]
fn delete_keys_drops_matching_lines_order_preserving() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("segment-1");
    write_segment(
        &path,
        0,
        vec![("1", "test1"), ("2", "test2"), ("4", "test6")].into_iter(),
    )
    .unwrap();

    let mut drop = HashSet::new();
    drop.insert("2".to_string());
    let empty = delete_keys(&path, &drop).unwrap();
    assert!(!empty);

    let remaining = read_records(&path).unwrap();
    assert_eq!(
        remaining,
        vec![
            ("1".to_string(), "test1".to_string()),
            ("4".to_string(), "test6".to_string()),
        ]
    );
}

#[test]
fn delete_keys_reports_empty_when_all_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("segment-1");
    write_segment(&path, 0, vec![("a", "1"), ("b", "2")].into_iter()).unwrap();

    let mut drop = HashSet::new();
    drop.insert("a".to_string());
    drop.insert("b".to_string());
    let empty = delete_keys(&path, &drop).unwrap();
    assert!(empty);
    assert!(read_records(&path).unwrap().is_empty());
}
