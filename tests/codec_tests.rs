//! Tests for the record and key-group run codecs
//!
//! These tests verify:
//! - Round-trip encoding for records and runs
//! - Merge semantics when decoding duplicate-key runs
//! - Clean end-of-stream vs truncation detection
//! - Count validation on malformed streams

use std::collections::BTreeMap;
use std::io::Cursor;

use binspill::codec::{read_groups, write_groups, BinRecord};
use binspill::SpillError;

// =============================================================================
// Helper Functions
// =============================================================================

fn record(key: i64, num_obs: i32, features: &[f32]) -> BinRecord {
    BinRecord::new(key, num_obs, features.to_vec())
}

fn encode(groups: &BTreeMap<i64, Vec<BinRecord>>) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_groups(&mut bytes, groups).unwrap();
    bytes
}

fn decode(bytes: &[u8]) -> binspill::Result<BTreeMap<i64, Vec<BinRecord>>> {
    let mut groups = BTreeMap::new();
    read_groups(&mut Cursor::new(bytes), &mut groups)?;
    Ok(groups)
}

// =============================================================================
// Record Codec Tests
// =============================================================================

#[test]
fn test_record_round_trip() {
    let original = record(42, 3, &[1.5, -2.25, 0.0]);

    let mut bytes = Vec::new();
    original.write_to(&mut bytes).unwrap();
    let recovered = BinRecord::read_from(42, &mut Cursor::new(&bytes)).unwrap();

    assert_eq!(original, recovered);
}

#[test]
fn test_record_empty_features() {
    let original = record(7, 1, &[]);

    let mut bytes = Vec::new();
    original.write_to(&mut bytes).unwrap();
    let recovered = BinRecord::read_from(7, &mut Cursor::new(&bytes)).unwrap();

    assert_eq!(recovered.num_obs, 1);
    assert!(recovered.features.is_empty());
}

#[test]
fn test_record_encoded_len_matches() {
    let rec = record(1, 5, &[1.0, 2.0, 3.0]);

    let mut bytes = Vec::new();
    rec.write_to(&mut bytes).unwrap();

    assert_eq!(bytes.len(), rec.encoded_len());
}

#[test]
fn test_record_truncated_payload() {
    let rec = record(9, 2, &[4.0, 5.0]);

    let mut bytes = Vec::new();
    rec.write_to(&mut bytes).unwrap();

    // Cut off mid-feature
    let truncated = &bytes[..bytes.len() - 2];
    let result = BinRecord::read_from(9, &mut Cursor::new(truncated));

    assert!(matches!(result, Err(SpillError::PageCorruption(_))));
}

#[test]
fn test_record_implausible_feature_count() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1i32.to_be_bytes()); // num_obs
    bytes.extend_from_slice(&i32::MAX.to_be_bytes()); // absurd feature count

    let result = BinRecord::read_from(0, &mut Cursor::new(&bytes));
    assert!(matches!(result, Err(SpillError::PageCorruption(_))));
}

// =============================================================================
// Run Codec Tests
// =============================================================================

#[test]
fn test_run_round_trip_multiple_groups() {
    let mut groups = BTreeMap::new();
    groups.insert(5, vec![record(5, 1, &[0.5]), record(5, 2, &[1.5])]);
    groups.insert(17, vec![record(17, 4, &[2.0, 3.0])]);
    groups.insert(9000, vec![record(9000, 1, &[])]);

    let recovered = decode(&encode(&groups)).unwrap();

    assert_eq!(recovered, groups);
}

#[test]
fn test_run_decode_empty_stream() {
    // Zero remaining bytes is the normal terminator, not an error
    let recovered = decode(&[]).unwrap();
    assert!(recovered.is_empty());
}

#[test]
fn test_run_decode_merges_duplicate_key_runs() {
    // Two runs for the same key in one stream accumulate into one group
    let mut first = BTreeMap::new();
    first.insert(3, vec![record(3, 1, &[1.0])]);
    let mut second = BTreeMap::new();
    second.insert(3, vec![record(3, 2, &[2.0])]);

    let mut bytes = encode(&first);
    bytes.extend_from_slice(&encode(&second));

    let recovered = decode(&bytes).unwrap();
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[&3].len(), 2);
    assert_eq!(recovered[&3][0].num_obs, 1);
    assert_eq!(recovered[&3][1].num_obs, 2);
}

#[test]
fn test_run_decode_merges_into_seeded_map() {
    let mut on_disk = BTreeMap::new();
    on_disk.insert(11, vec![record(11, 1, &[7.0])]);
    let bytes = encode(&on_disk);

    // Caller pre-seeds the target map; decoded records append
    let mut groups = BTreeMap::new();
    groups.insert(11, vec![record(11, 9, &[6.0])]);
    read_groups(&mut Cursor::new(&bytes), &mut groups).unwrap();

    assert_eq!(groups[&11].len(), 2);
    assert_eq!(groups[&11][0].num_obs, 9);
    assert_eq!(groups[&11][1].num_obs, 1);
}

#[test]
fn test_run_truncated_header() {
    let mut groups = BTreeMap::new();
    groups.insert(1, vec![record(1, 1, &[1.0])]);
    let mut bytes = encode(&groups);

    // Append a partial next-run header
    bytes.extend_from_slice(&2i64.to_be_bytes()[..5]);

    let result = decode(&bytes);
    assert!(matches!(result, Err(SpillError::PageCorruption(_))));
}

#[test]
fn test_run_truncated_body() {
    let mut groups = BTreeMap::new();
    groups.insert(1, vec![record(1, 1, &[1.0, 2.0, 3.0])]);
    let bytes = encode(&groups);

    let result = decode(&bytes[..bytes.len() - 4]);
    assert!(matches!(result, Err(SpillError::PageCorruption(_))));
}

#[test]
fn test_run_invalid_record_count() {
    // Run header claiming zero records: empty groups are not a legal state
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&4i64.to_be_bytes());
    bytes.extend_from_slice(&0i32.to_be_bytes());

    let result = decode(&bytes);
    assert!(matches!(result, Err(SpillError::PageCorruption(_))));
}

#[test]
fn test_run_negative_record_count() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&4i64.to_be_bytes());
    bytes.extend_from_slice(&(-3i32).to_be_bytes());

    let result = decode(&bytes);
    assert!(matches!(result, Err(SpillError::PageCorruption(_))));
}

#[test]
fn test_run_groups_written_in_ascending_key_order() {
    let mut groups = BTreeMap::new();
    groups.insert(300, vec![record(300, 1, &[])]);
    groups.insert(2, vec![record(2, 1, &[])]);
    groups.insert(45, vec![record(45, 1, &[])]);

    let bytes = encode(&groups);

    // First run's key is the smallest
    let first_key = i64::from_be_bytes(bytes[0..8].try_into().unwrap());
    assert_eq!(first_key, 2);
}
