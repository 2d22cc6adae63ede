//! Turning joined raw rows into a clean, binary-labelled table.
//!
//! A `categories` cell looks like `related-1;request-0;offer-0;...`. The
//! label names come from the first row; every later row must carry the same
//! names in the same order.

use std::collections::HashSet;

use crate::dataset::ingest::{JoinedRecord, JoinedTable};
use crate::dataset::table::{MessageRow, MessageTable};
use crate::error::{DisasterError, Result};

/// The label whose value `2` is folded into `1`.
pub const RELATED_LABEL: &str = "related";

/// Split a `categories` cell into `(name, value)` pairs.
///
/// The name is the text before the first `-`, the value the text between the
/// first and second `-`. A missing or non-numeric value reads as `0`.
/// Blank entries, such as the one after a trailing `;`, are skipped.
pub fn parse_categories(cell: &str) -> Vec<(String, i64)> {
    cell.split(';')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let mut pieces = entry.split('-');
            let name = pieces.next().unwrap_or_default().trim().to_string();
            let value = pieces
                .next()
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0);
            (name, value)
        })
        .collect()
}

/// Clean a joined table into `{message, genre, <label>...}` rows.
///
/// Rows with a null message, genre or categories cell are dropped, as are
/// rows without any label set and exact duplicates (first one wins).
pub fn clean_data(joined: &JoinedTable) -> Result<MessageTable> {
    let Some(first) = joined.records.first() else {
        return Ok(MessageTable::default());
    };
    let schema: Vec<String> = match &first.categories {
        Some(cell) => parse_categories(cell)
            .into_iter()
            .map(|(name, _)| name)
            .collect(),
        None => {
            return Err(DisasterError::schema(
                "row 0 has no categories to derive label names from",
            ));
        }
    };
    log::info!("Category columns: {}", schema.join(", "));

    let mut rows = Vec::with_capacity(joined.len());
    let mut dropped_nulls = 0usize;
    for (index, record) in joined.records.iter().enumerate() {
        match clean_record(index, record, &schema)? {
            Some(row) => rows.push(row),
            None => dropped_nulls += 1,
        }
    }
    if dropped_nulls > 0 {
        log::debug!("Dropped {dropped_nulls} rows with null cells");
    }

    let table = clean_table(MessageTable::from_parts(schema, rows));
    log::info!(
        "Cleaned {} input rows into {} rows",
        joined.len(),
        table.len()
    );
    Ok(table)
}

fn clean_record(index: usize, record: &JoinedRecord, schema: &[String]) -> Result<Option<MessageRow>> {
    let Some(cell) = &record.categories else {
        return Ok(None);
    };

    let parsed = parse_categories(cell);
    if parsed.len() != schema.len() {
        return Err(DisasterError::schema(format!(
            "row {index} has {} categories, expected {}",
            parsed.len(),
            schema.len()
        )));
    }

    let mut labels = Vec::with_capacity(schema.len());
    for ((name, value), expected) in parsed.into_iter().zip(schema) {
        if &name != expected {
            return Err(DisasterError::schema(format!(
                "row {index} has category '{name}' where '{expected}' was expected"
            )));
        }
        let label = match (name.as_str(), value) {
            (_, 0) => 0,
            (_, 1) => 1,
            (RELATED_LABEL, 2) => 1,
            (_, other) => {
                return Err(DisasterError::schema(format!(
                    "row {index} has non-binary value {other} for '{name}'"
                )));
            }
        };
        labels.push(label);
    }

    match (&record.message, &record.genre) {
        (Some(message), Some(genre)) => Ok(Some(MessageRow::new(message, genre, labels))),
        _ => Ok(None),
    }
}

/// Drop degenerate rows and exact duplicates from an already-parsed table.
///
/// Running it on its own output changes nothing.
pub fn clean_table(table: MessageTable) -> MessageTable {
    let label_names = table.label_names().to_vec();
    let before = table.len();

    let mut seen = HashSet::new();
    let mut degenerate = 0usize;
    let rows: Vec<MessageRow> = table
        .into_rows()
        .into_iter()
        .filter(|row| {
            if row.is_degenerate() {
                degenerate += 1;
                return false;
            }
            seen.insert(row.clone())
        })
        .collect();

    log::debug!(
        "Removed {degenerate} all-zero rows and {} duplicates",
        before - degenerate - rows.len()
    );

    MessageTable::from_parts(label_names, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: Option<&str>, genre: Option<&str>, categories: Option<&str>) -> JoinedRecord {
        JoinedRecord {
            id: None,
            message: message.map(str::to_string),
            original: None,
            genre: genre.map(str::to_string),
            categories: categories.map(str::to_string),
        }
    }

    fn joined(records: Vec<JoinedRecord>) -> JoinedTable {
        JoinedTable { records }
    }

    #[test]
    fn test_parse_categories() {
        let parsed = parse_categories("related-1;request-0;offer-x;aid_related");
        assert_eq!(
            parsed,
            vec![
                ("related".to_string(), 1),
                ("request".to_string(), 0),
                ("offer".to_string(), 0),
                ("aid_related".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_trailing_separator_adds_no_label() {
        let table = clean_data(&joined(vec![
            record(Some("need water"), Some("direct"), Some("related-1;request-0;")),
            record(Some("send food"), Some("direct"), Some("related-1;request-1;")),
        ]))
        .unwrap();

        assert_eq!(table.label_names().to_vec(), vec!["related", "request"]);
        assert_eq!(table.columns(), vec!["message", "genre", "related", "request"]);
        assert!(table.rows().iter().all(|row| row.labels.len() == 2));
    }

    #[test]
    fn test_clean_data_basic() {
        let table = clean_data(&joined(vec![
            record(Some("need water"), Some("direct"), Some("related-1;water-1;food-0")),
            record(Some("storm news"), Some("news"), Some("related-2;water-0;food-0")),
            record(Some("hello"), Some("social"), Some("related-0;water-0;food-0")),
        ]))
        .unwrap();

        assert_eq!(table.label_names(), &["related", "water", "food"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].labels, vec![1, 1, 0]);
        assert_eq!(table.rows()[1].labels, vec![1, 0, 0]);
    }

    #[test]
    fn test_related_never_two() {
        let table = clean_data(&joined(vec![
            record(Some("a"), Some("news"), Some("related-2;water-1")),
            record(Some("b"), Some("news"), Some("related-2;water-0")),
        ]))
        .unwrap();

        assert!(table
            .rows()
            .iter()
            .all(|row| row.labels.iter().all(|&label| label <= 1)));
    }

    #[test]
    fn test_duplicates_and_nulls_dropped() {
        let table = clean_data(&joined(vec![
            record(Some("a"), Some("news"), Some("related-1;water-1")),
            record(Some("a"), Some("news"), Some("related-1;water-1")),
            record(None, Some("news"), Some("related-1;water-0")),
            record(Some("b"), None, Some("related-1;water-0")),
            record(Some("c"), Some("direct"), None),
            record(Some("a"), Some("direct"), Some("related-1;water-1")),
        ]))
        .unwrap();

        assert_eq!(table.messages(), vec!["a", "a"]);
        assert_eq!(table.rows()[1].genre, "direct");
    }

    #[test]
    fn test_schema_mismatch_count() {
        let result = clean_data(&joined(vec![
            record(Some("a"), Some("news"), Some("related-1;water-1")),
            record(Some("b"), Some("news"), Some("related-1")),
        ]));

        match result {
            Err(DisasterError::Schema(message)) => assert!(message.contains("row 1")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_mismatch_name() {
        let result = clean_data(&joined(vec![
            record(Some("a"), Some("news"), Some("related-1;water-1")),
            record(Some("b"), Some("news"), Some("related-1;food-1")),
        ]));
        assert!(matches!(result, Err(DisasterError::Schema(_))));
    }

    #[test]
    fn test_non_binary_value() {
        let result = clean_data(&joined(vec![record(
            Some("a"),
            Some("news"),
            Some("related-1;water-3"),
        )]));
        assert!(matches!(result, Err(DisasterError::Schema(_))));
    }

    #[test]
    fn test_empty_input() {
        let table = clean_data(&JoinedTable::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_clean_table_idempotent() {
        let once = clean_data(&joined(vec![
            record(Some("a"), Some("news"), Some("related-1;water-1")),
            record(Some("a"), Some("news"), Some("related-1;water-1")),
            record(Some("b"), Some("news"), Some("related-0;water-0")),
            record(Some("c"), Some("direct"), Some("related-1;water-0")),
        ]))
        .unwrap();
        let twice = clean_table(once.clone());

        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
