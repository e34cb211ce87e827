use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed incident scenario generated once at session creation and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub alert: String,
    pub correct_diagnosis: String,
    pub environment: Environment,
}

/// Everything the diagnostic tools can observe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub dependencies: Vec<DependencyFact>,
    pub slack_messages: Vec<SlackMessage>,
    pub deployments: Vec<Deployment>,
    pub logs: Vec<LogRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyFact {
    pub name: String,
    pub status: String,
    pub response_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackMessage {
    pub user: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub service: String,
    pub status: String,
    pub timestamp: String,
}

/// One structured log line. `metadata` is an arbitrary JSON object; it is
/// serialized to a string when seeded into the log store and parsed back at
/// query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: String,
    pub service: String,
    pub message: String,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Terminal response of `submit_diagnosis`. Returned exactly once per
/// session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub correct: bool,
    pub correct_diagnosis: String,
    pub agent_diagnosis: String,
    pub primary_reward: f64,
    pub efficiency_reward: f64,
    pub total_reward: f64,
    pub tool_calls_used: u32,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_record_metadata_defaults_to_empty_object() {
        let record: LogRecord = serde_json::from_str(
            r#"{"timestamp": "t", "level": "INFO", "service": "s", "message": "m"}"#,
        )
        .unwrap();
        assert_eq!(record.metadata, serde_json::json!({}));
    }
}
