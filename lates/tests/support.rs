#![allow(dead_code)]

use lates::Record;

/// Sorts records by key, since a registry lists them in no particular order.
pub fn sorted(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| a.key().cmp(b.key()));
    records
}
