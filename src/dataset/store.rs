//! SQLite persistence for the cleaned message table.
//!
//! The table is stored as `{message TEXT, genre TEXT, <label> INTEGER...}`
//! and every save replaces the whole table.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, params, params_from_iter};

use crate::dataset::table::{GENRE_COLUMN, MESSAGE_COLUMN, MessageRow, MessageTable};
use crate::error::{DisasterError, Result};

/// Table name used when none is given.
pub const DEFAULT_TABLE_NAME: &str = "disaster_table";

/// A handle on the SQLite database holding message tables.
pub struct MessageStore {
    conn: Connection,
}

impl std::fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl MessageStore {
    /// Open (creating if needed) a database for writing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Ok(MessageStore { conn })
    }

    /// Open an existing database without write access.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| {
                DisasterError::invalid_argument(format!(
                    "cannot open database {}: {e}",
                    path.display()
                ))
            })?;
        Ok(MessageStore { conn })
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(MessageStore {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Whether a table called `name` exists.
    pub fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Replace table `name` with the contents of `table`.
    pub fn save(&mut self, table: &MessageTable, name: &str) -> Result<()> {
        let quoted = quote_identifier(name);
        let mut columns = vec![
            format!("{} TEXT", quote_identifier(MESSAGE_COLUMN)),
            format!("{} TEXT", quote_identifier(GENRE_COLUMN)),
        ];
        columns.extend(
            table
                .label_names()
                .iter()
                .map(|label| format!("{} INTEGER", quote_identifier(label))),
        );

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {quoted};
             CREATE TABLE {quoted} ({});",
            columns.join(", ")
        ))?;

        {
            let placeholders = vec!["?"; columns.len()].join(", ");
            let mut stmt = tx.prepare(&format!("INSERT INTO {quoted} VALUES ({placeholders})"))?;
            for row in table.rows() {
                let mut values = Vec::with_capacity(columns.len());
                values.push(Value::Text(row.message.clone()));
                values.push(Value::Text(row.genre.clone()));
                values.extend(row.labels.iter().map(|&label| Value::Integer(i64::from(label))));
                stmt.execute(params_from_iter(values.iter()))?;
            }
        }

        tx.commit()?;
        log::info!("Saved {} rows to table '{name}'", table.len());
        Ok(())
    }

    /// Read table `name` back. Column 0 is the message, column 1 the genre,
    /// the remaining columns are labels.
    pub fn load(&self, name: &str) -> Result<MessageTable> {
        if !self.has_table(name)? {
            return Err(DisasterError::invalid_argument(format!(
                "table '{name}' does not exist"
            )));
        }

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {}", quote_identifier(name)))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        if columns.len() < 2 || columns[0] != MESSAGE_COLUMN || columns[1] != GENRE_COLUMN {
            return Err(DisasterError::schema(format!(
                "table '{name}' must start with '{MESSAGE_COLUMN}' and '{GENRE_COLUMN}' columns, found {columns:?}"
            )));
        }
        let width = columns.len();

        let raw_rows = stmt.query_map([], |row| {
            let message: String = row.get(0)?;
            let genre: String = row.get(1)?;
            let labels = (2..width)
                .map(|i| row.get::<_, i64>(i))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok((message, genre, labels))
        })?;

        let mut table = MessageTable::new(columns[2..].to_vec());
        for (index, raw) in raw_rows.enumerate() {
            let (message, genre, labels) = raw?;
            let labels = labels
                .into_iter()
                .map(|value| {
                    u8::try_from(value).map_err(|_| {
                        DisasterError::schema(format!("row {index} has label value {value}"))
                    })
                })
                .collect::<Result<Vec<u8>>>()?;
            table.push(MessageRow::new(message, genre, labels))?;
        }

        log::info!("Loaded {} rows from table '{name}'", table.len());
        Ok(table)
    }
}

/// Write `table` into the database at `path`, replacing table `name`.
pub fn save_table<P: AsRef<Path>>(table: &MessageTable, path: P, name: &str) -> Result<()> {
    MessageStore::open(path)?.save(table, name)
}

/// Read table `name` from the database at `path`.
pub fn load_table<P: AsRef<Path>>(path: P, name: &str) -> Result<MessageTable> {
    MessageStore::open_read_only(path)?.load(name)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
