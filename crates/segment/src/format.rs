//! On-disk record encoding shared by segments and the WAL: one record per
//! line, `key,value\n`, plain UTF-8. Neither key nor value may contain the
//! field separator (`,`) or the line terminator (`\n`).

use crate::SegmentError;

/// Formats a single record as it appears on disk, including the trailing
/// newline.
pub fn record_line(key: &str, value: &str) -> Result<String, SegmentError> {
    validate_field(key)?;
    validate_field(value)?;
    Ok(format!("{key},{value}\n"))
}

/// Splits one already-read line (without its trailing newline) into its key
/// and value.
pub fn split_record(line: &str) -> Result<(String, String), SegmentError> {
    match line.split_once(',') {
        Some((k, v)) => Ok((k.to_string(), v.to_string())),
        None => Err(SegmentError::Corrupt(format!(
            "record missing field separator: {line:?}"
        ))),
    }
}

fn validate_field(field: &str) -> Result<(), SegmentError> {
    if field.is_empty() {
        return Err(SegmentError::InvalidRecord(
            "key and value must be non-empty".to_string(),
        ));
    }
    if field.contains(',') || field.contains('\n') {
        return Err(SegmentError::InvalidRecord(format!(
            "field must not contain ',' or newline: {field:?}"
        )));
    }
    Ok(())
}
