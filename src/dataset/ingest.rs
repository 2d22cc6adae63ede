//! Loading and joining the raw message and category inputs.
//!
//! Both inputs are CSV files with a header row:
//! ```csv
//! id,message,original,genre
//! 2,Weather update - a cold front from Cuba,Un front froid se retrouve sur Cuba,direct
//! ```
//! ```csv
//! id,categories
//! 2,related-1;request-0;offer-0
//! ```
//! Rows are joined by position; the `id` column of the categories file is
//! ignored. Empty cells and the usual missing-value markers (`NA`, `N/A`,
//! `nan`, `null`, ...) read as nulls.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{DisasterError, Result};

/// Cell contents treated as missing values, matched exactly.
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell counts as a null.
pub fn is_null_cell(value: &str) -> bool {
    NULL_MARKERS.contains(&value)
}

/// One positionally joined input row. Null cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinedRecord {
    pub id: Option<String>,
    pub message: Option<String>,
    pub original: Option<String>,
    pub genre: Option<String>,
    pub categories: Option<String>,
}

/// The joined `{id, message, original, genre, categories}` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinedTable {
    pub records: Vec<JoinedRecord>,
}

impl JoinedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read both CSV files and join them row by row.
pub fn load_data<P: AsRef<Path>, Q: AsRef<Path>>(
    messages_path: P,
    categories_path: Q,
) -> Result<JoinedTable> {
    let messages_path = messages_path.as_ref();
    let categories_path = categories_path.as_ref();

    let messages = File::open(messages_path).map_err(|e| {
        DisasterError::ingest(format!(
            "cannot open messages file {}: {e}",
            messages_path.display()
        ))
    })?;
    let categories = File::open(categories_path).map_err(|e| {
        DisasterError::ingest(format!(
            "cannot open categories file {}: {e}",
            categories_path.display()
        ))
    })?;

    let table = join_readers(messages, categories)?;
    log::info!(
        "Loaded {} rows from {} and {}",
        table.len(),
        messages_path.display(),
        categories_path.display()
    );
    Ok(table)
}

/// Join two CSV streams by position.
pub fn join_readers<M: Read, C: Read>(messages: M, categories: C) -> Result<JoinedTable> {
    let messages = read_columns(messages, "messages", &["message", "genre"], &["id", "original"])?;
    let categories = read_columns(categories, "categories", &["categories"], &[])?;

    if messages.len() != categories.len() {
        return Err(DisasterError::ingest(format!(
            "row count mismatch: {} messages but {} category rows",
            messages.len(),
            categories.len()
        )));
    }

    let records = messages
        .into_iter()
        .zip(categories)
        .map(|(mut message_row, mut category_row)| JoinedRecord {
            message: message_row.remove("message"),
            genre: message_row.remove("genre"),
            id: message_row.remove("id"),
            original: message_row.remove("original"),
            categories: category_row.remove("categories"),
        })
        .collect();

    Ok(JoinedTable { records })
}

/// A row reduced to the requested columns.
struct Cells(Vec<(&'static str, Option<String>)>);

impl Cells {
    fn remove(&mut self, column: &str) -> Option<String> {
        self.0
            .iter_mut()
            .find(|(name, _)| *name == column)
            .and_then(|(_, value)| value.take())
    }
}

fn read_columns<R: Read>(
    input: R,
    source: &str,
    required: &[&'static str],
    optional: &[&'static str],
) -> Result<Vec<Cells>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| DisasterError::ingest(format!("failed to read {source} header: {e}")))?
        .clone();

    let mut positions: Vec<(&'static str, Option<usize>)> = Vec::new();
    for &column in required {
        let index = column_index(&headers, column).ok_or_else(|| {
            DisasterError::ingest(format!("{source} input has no '{column}' column"))
        })?;
        positions.push((column, Some(index)));
    }
    for &column in optional {
        positions.push((column, column_index(&headers, column)));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells = positions
            .iter()
            .map(|&(column, index)| {
                let value = index
                    .and_then(|i| record.get(i))
                    .filter(|value| !is_null_cell(value))
                    .map(str::to_string);
                (column, value)
            })
            .collect();
        rows.push(Cells(cells));
    }

    Ok(rows)
}

fn column_index(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == column)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    const MESSAGES: &str = "id,message,original,genre\n\
        2,Weather update - a cold front from Cuba,Un front froid,direct\n\
        7,\"Is the Hurricane over, or not?\",,direct\n\
        12,says: west side of Haiti,,news\n";

    const CATEGORIES: &str = "id,categories\n\
        2,related-1;request-0;offer-0\n\
        7,related-1;request-1;offer-0\n\
        12,related-2;request-0;offer-0\n";

    #[test]
    fn test_join_by_position() {
        let table = join_readers(MESSAGES.as_bytes(), CATEGORIES.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.records[0].id.as_deref(), Some("2"));
        assert_eq!(
            table.records[1].message.as_deref(),
            Some("Is the Hurricane over, or not?")
        );
        assert_eq!(table.records[1].original, None);
        assert_eq!(table.records[2].genre.as_deref(), Some("news"));
        assert_eq!(
            table.records[2].categories.as_deref(),
            Some("related-2;request-0;offer-0")
        );
    }

    #[test]
    fn test_missing_value_markers_are_null() {
        let messages = "id,message,original,genre\n\
            1,NA,nan,direct\n\
            2,Nan is my village,N/A,null\n";
        let categories = "id,categories\n1,related-1\n2,NaN\n";
        let table = join_readers(messages.as_bytes(), categories.as_bytes()).unwrap();

        assert_eq!(table.records[0].message, None);
        assert_eq!(table.records[0].original, None);
        assert_eq!(table.records[0].genre.as_deref(), Some("direct"));
        assert_eq!(table.records[1].message.as_deref(), Some("Nan is my village"));
        assert_eq!(table.records[1].original, None);
        assert_eq!(table.records[1].genre, None);
        assert_eq!(table.records[1].categories, None);
    }

    #[test]
    fn test_row_count_mismatch() {
        let categories = "id,categories\n2,related-1;request-0;offer-0\n";
        let result = join_readers(MESSAGES.as_bytes(), categories.as_bytes());

        match result {
            Err(DisasterError::Ingest(message)) => {
                assert!(message.contains("3 messages"));
                assert!(message.contains("1 category rows"));
            }
            other => panic!("expected ingest error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_column() {
        let messages = "id,text,genre\n1,hello,direct\n";
        let result = join_readers(messages.as_bytes(), "categories\nrelated-1\n".as_bytes());
        assert!(matches!(result, Err(DisasterError::Ingest(_))));
    }

    #[test]
    fn test_optional_columns_absent() {
        let messages = "message,genre\nhello,direct\n";
        let table = join_readers(messages.as_bytes(), "categories\nrelated-1\n".as_bytes()).unwrap();

        assert_eq!(table.records[0].id, None);
        assert_eq!(table.records[0].original, None);
        assert_eq!(table.records[0].message.as_deref(), Some("hello"));
    }

    #[test]
    fn test_load_data_from_files() {
        let dir = TempDir::new().unwrap();
        let messages_path = dir.path().join("messages.csv");
        let categories_path = dir.path().join("categories.csv");
        File::create(&messages_path)
            .unwrap()
            .write_all(MESSAGES.as_bytes())
            .unwrap();
        File::create(&categories_path)
            .unwrap()
            .write_all(CATEGORIES.as_bytes())
            .unwrap();

        let table = load_data(&messages_path, &categories_path).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_data(dir.path().join("nope.csv"), dir.path().join("nope2.csv"));
        assert!(matches!(result, Err(DisasterError::Ingest(_))));
    }
}
