pub mod rows;
pub mod sqlite;

pub use rows::LogRow;
pub use sqlite::SqliteLogStore;

use crate::model::LogRecord;

/// Storage seam for the per-session log table.
///
/// The session needs exactly two capabilities: bulk seeding at creation and
/// read-only query execution afterwards. Keeping them behind a trait lets the
/// host inject any SQL-capable store (in-memory SQLite, a file, a platform
/// storage binding) without the state machine knowing which.
pub trait LogStore {
    /// Append one record to the `logs` table.
    fn insert(&mut self, record: &LogRecord) -> anyhow::Result<()>;

    /// Run a caller-supplied statement and map each result row by column
    /// name. Statements that do not yield the expected columns fail; the
    /// caller converts any failure into an in-band error payload.
    fn execute(&self, sql: &str) -> anyhow::Result<Vec<LogRow>>;
}
