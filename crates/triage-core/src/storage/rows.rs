use serde::{Deserialize, Serialize};

/// One row read back from the `logs` table.
///
/// `metadata` stays in its stored string form here; deserialization happens
/// at the tool boundary so a corrupt stored value fails the query it was read
/// by instead of poisoning the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp: String,
    pub level: String,
    pub service: String,
    pub message: String,
    pub metadata: Option<String>,
}
