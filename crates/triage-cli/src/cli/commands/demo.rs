use anyhow::Result;
use serde_json::json;
use uuid::Uuid;

use triage_core::SessionRegistry;

use crate::cli::args::DemoArgs;

/// Scripted end-to-end session against an in-process registry: initial
/// state, tool catalog, one pass over each diagnostic tool, a narrowing log
/// query, then the diagnosis. Useful as a smoke check and as a worked
/// example of the envelope protocol.
pub fn run(args: DemoArgs) -> Result<i32> {
    let key = args
        .session_key
        .unwrap_or_else(|| format!("demo-{}", Uuid::new_v4().simple()));
    let mut registry = SessionRegistry::in_memory();

    println!("# triage demo — session {key} — {}", chrono::Utc::now().to_rfc3339());

    let script = [
        json!({ "action": "get_initial_state" }),
        json!({ "action": "get_tools" }),
        json!({
            "action": "use_tool",
            "tool_call": { "name": "check_dependencies", "arguments": {} }
        }),
        json!({
            "action": "use_tool",
            "tool_call": { "name": "check_slack", "arguments": { "query": "db" } }
        }),
        json!({
            "action": "use_tool",
            "tool_call": { "name": "check_deployments", "arguments": {} }
        }),
        json!({
            "action": "use_tool",
            "tool_call": {
                "name": "query_logs",
                "arguments": {
                    "sql_query": "SELECT * FROM logs WHERE level = 'ERROR' ORDER BY timestamp DESC LIMIT 5"
                }
            }
        }),
        json!({ "action": "submit_diagnosis", "diagnosis": args.diagnosis }),
    ];

    for request in script {
        println!(">> {request}");
        match registry.handle(&key, &request) {
            Ok(body) => println!("<< {}", serde_json::to_string_pretty(&body)?),
            Err(e) => println!("!! {} (status {})", e, e.status()),
        }
    }
    Ok(0)
}
