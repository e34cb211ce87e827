pub mod logquery;

use serde_json::{json, Value};
use tracing::debug;

use crate::model::Incident;
use crate::storage::LogStore;

/// Catalog of the four fixed diagnostic tools, in the shape callers embed in
/// their prompts: `{type, name, description, parameters}` with a
/// JSON-schema-like parameter spec. The `query_logs` description states the
/// table schema verbatim so callers can write valid statements.
pub fn definitions() -> Vec<Value> {
    vec![
        json!({
            "type": "function",
            "name": "check_dependencies",
            "description": "Check status of service dependencies",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Optional: filter by service name"
                    }
                }
            }
        }),
        json!({
            "type": "function",
            "name": "check_slack",
            "description": "Search recent Slack messages from team members",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Optional: search term to filter messages"
                    }
                }
            }
        }),
        json!({
            "type": "function",
            "name": "check_deployments",
            "description": "Check recent deployment status and history",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Optional: filter by service name"
                    }
                }
            }
        }),
        json!({
            "type": "function",
            "name": "query_logs",
            "description": "Execute SQL query on logs database. Table schema: logs(id INTEGER, timestamp TEXT, level TEXT, service TEXT, message TEXT, metadata TEXT)",
            "parameters": {
                "type": "object",
                "properties": {
                    "sql_query": {
                        "type": "string",
                        "description": "SQL SELECT query to execute against logs table. Use LIMIT to control result size."
                    }
                },
                "required": ["sql_query"]
            }
        }),
    ]
}

/// Execute one tool against session state.
///
/// Dispatch is by exact name; unknown names return an in-band error payload,
/// not a fault — the caller has already paid the budget decrement either way.
pub fn dispatch(
    incident: &Incident,
    store: &dyn LogStore,
    max_rows: usize,
    name: &str,
    arguments: &Value,
) -> Value {
    debug!(tool = name, "dispatching tool call");
    match name {
        "check_dependencies" => check_dependencies(incident, arguments),
        "check_slack" => check_slack(incident, arguments),
        "check_deployments" => check_deployments(incident, arguments),
        "query_logs" => logquery::run(store, max_rows, str_arg(arguments, "sql_query")),
        other => json!({ "error": format!("Unknown tool: {}", other) }),
    }
}

fn str_arg<'a>(arguments: &'a Value, key: &str) -> &'a str {
    arguments.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Case-insensitive substring filter; an empty query keeps everything.
fn matches(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(query)
}

fn check_dependencies(incident: &Incident, arguments: &Value) -> Value {
    let query = str_arg(arguments, "query").to_lowercase();
    let dependencies: Vec<_> = incident
        .environment
        .dependencies
        .iter()
        .filter(|d| matches(&d.name, &query))
        .collect();
    json!({ "dependencies": dependencies })
}

fn check_slack(incident: &Incident, arguments: &Value) -> Value {
    let query = str_arg(arguments, "query").to_lowercase();
    let messages: Vec<_> = incident
        .environment
        .slack_messages
        .iter()
        .filter(|m| matches(&m.content, &query))
        .collect();
    json!({ "messages": messages })
}

fn check_deployments(incident: &Incident, arguments: &Value) -> Value {
    let query = str_arg(arguments, "query").to_lowercase();
    let deployments: Vec<_> = incident
        .environment
        .deployments
        .iter()
        .filter(|d| matches(&d.service, &query))
        .collect();
    json!({ "deployments": deployments })
}
