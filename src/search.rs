use crate::service::Record;

/// Case-insensitive substring match against the string form of every field.
pub fn record_matches(record: &Record, query_lower: &str) -> bool {
    Record::FIELDS
        .iter()
        .any(|key| record.field_text(key).to_lowercase().contains(query_lower))
}

/// Records matching `query`; an empty query keeps everything in order.
pub fn filter_records(records: &[Record], query: &str) -> Vec<Record> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| record_matches(r, &q))
        .cloned()
        .collect()
}
