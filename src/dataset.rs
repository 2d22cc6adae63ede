//! Message data: ingestion, cleaning and persistence.
//!
//! ```text
//! messages.csv ─┐
//!               ├─ ingest::load_data ─ clean::clean_data ─ store::save_table ─ SQLite
//! categories.csv┘
//! ```

pub mod clean;
pub mod ingest;
pub mod store;
pub mod table;

pub use clean::{clean_data, clean_table};
pub use ingest::{JoinedRecord, JoinedTable, load_data};
pub use store::{DEFAULT_TABLE_NAME, MessageStore, load_table, save_table};
pub use table::{MessageRow, MessageTable};
