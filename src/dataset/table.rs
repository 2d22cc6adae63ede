//! The cleaned, rectangular message table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DisasterError, Result};

/// Name of the text column.
pub const MESSAGE_COLUMN: &str = "message";

/// Name of the genre column.
pub const GENRE_COLUMN: &str = "genre";

/// One cleaned message with its binary label vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRow {
    pub message: String,
    pub genre: String,
    pub labels: Vec<u8>,
}

impl MessageRow {
    pub fn new<M: Into<String>, G: Into<String>>(message: M, genre: G, labels: Vec<u8>) -> Self {
        MessageRow {
            message: message.into(),
            genre: genre.into(),
            labels,
        }
    }

    /// True when no label is set.
    pub fn is_degenerate(&self) -> bool {
        self.labels.iter().all(|&label| label == 0)
    }
}

/// Table of `{message, genre, <label>...}` rows sharing one category schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTable {
    label_names: Vec<String>,
    rows: Vec<MessageRow>,
}

impl MessageTable {
    /// Create an empty table with the given label columns.
    pub fn new(label_names: Vec<String>) -> Self {
        MessageTable {
            label_names,
            rows: Vec::new(),
        }
    }

    /// Append a row, checking it against the table's label schema.
    pub fn push(&mut self, row: MessageRow) -> Result<()> {
        if row.labels.len() != self.label_names.len() {
            return Err(DisasterError::schema(format!(
                "row has {} labels, table has {} label columns",
                row.labels.len(),
                self.label_names.len()
            )));
        }
        if let Some(value) = row.labels.iter().find(|&&label| label > 1) {
            return Err(DisasterError::schema(format!(
                "label value {value} is not binary"
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn rows(&self) -> &[MessageRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<MessageRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All column names in storage order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![MESSAGE_COLUMN.to_string(), GENRE_COLUMN.to_string()];
        columns.extend(self.label_names.iter().cloned());
        columns
    }

    /// The message texts, in row order.
    pub fn messages(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.message.as_str()).collect()
    }

    /// The label matrix, one vector per row.
    pub fn label_matrix(&self) -> Vec<Vec<u8>> {
        self.rows.iter().map(|row| row.labels.clone()).collect()
    }

    /// Number of messages per genre, ordered by genre name.
    pub fn genre_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.genre.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Column-wise sum of every label, in schema order.
    pub fn label_sums(&self) -> Vec<(String, u64)> {
        let mut sums = vec![0u64; self.label_names.len()];
        for row in &self.rows {
            for (sum, &label) in sums.iter_mut().zip(&row.labels) {
                *sum += u64::from(label);
            }
        }
        self.label_names.iter().cloned().zip(sums).collect()
    }

    /// Build a new table with the same schema holding the rows at `indices`.
    pub fn select(&self, indices: &[usize]) -> MessageTable {
        MessageTable {
            label_names: self.label_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    pub(crate) fn from_parts(label_names: Vec<String>, rows: Vec<MessageRow>) -> Self {
        MessageTable { label_names, rows }
    }
}
