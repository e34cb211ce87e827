use serde_json::{json, Map, Value};

use crate::storage::{LogRow, LogStore};

/// Guarded read-only query path for the session's private log table.
///
/// The gate is a prefix check on the leading keyword only; it does not parse
/// the rest of the statement. Everything the driver rejects downstream comes
/// back as the in-band `SQL execution failed` payload — no fault escapes.
pub fn run(store: &dyn LogStore, max_rows: usize, sql: &str) -> Value {
    if sql.is_empty() {
        return json!({ "error": "No SQL query provided" });
    }
    if !sql.trim().to_uppercase().starts_with("SELECT") {
        return json!({ "error": "Only SELECT queries are allowed" });
    }

    let rows = match store.execute(sql) {
        Ok(rows) => rows,
        Err(e) => return json!({ "error": format!("SQL execution failed: {}", e) }),
    };

    let mut logs = Vec::with_capacity(rows.len());
    for row in &rows {
        match render_row(row) {
            Ok(v) => logs.push(v),
            Err(e) => return json!({ "error": format!("SQL execution failed: {}", e) }),
        }
    }

    let total_found = logs.len();
    if total_found > max_rows {
        logs.truncate(max_rows);
        return json!({
            "logs": logs,
            "total_found": total_found,
            "query_executed": sql,
            "warning": format!(
                "Query returned {} results, showing first {}. Consider adding additional filters (WHERE, LIMIT) to narrow results.",
                total_found, max_rows
            ),
        });
    }

    json!({
        "logs": logs,
        "total_found": total_found,
        "query_executed": sql,
    })
}

fn render_row(row: &LogRow) -> anyhow::Result<Value> {
    let metadata = match row.metadata.as_deref() {
        None | Some("") => Value::Object(Map::new()),
        Some(raw) => serde_json::from_str(raw)?,
    };
    Ok(json!({
        "timestamp": row.timestamp,
        "level": row.level,
        "service": row.service,
        "message": row.message,
        "metadata": metadata,
    }))
}
