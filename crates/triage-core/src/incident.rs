use serde_json::json;

use crate::model::{DependencyFact, Deployment, Environment, Incident, LogRecord, SlackMessage};

/// Produce the incident scenario for a new session.
///
/// Static for now: one database-saturation incident with corroborating
/// signal spread across every tool surface, so an agent can reach the answer
/// from more than one direction. A future generator may randomize scenarios;
/// the contract stays fixed — `alert` is human-readable, `correct_diagnosis`
/// is compared case-insensitively, and `environment.logs` seeds the session's
/// log store 1:1 at creation.
pub fn generate() -> Incident {
    Incident {
        alert: "High database response times detected. Users reporting slow page loads.".into(),
        correct_diagnosis: "database connection pool exhausted".into(),
        environment: Environment {
            dependencies: vec![
                DependencyFact {
                    name: "postgres-primary".into(),
                    status: "degraded".into(),
                    response_time: "5000ms".into(),
                },
                DependencyFact {
                    name: "redis".into(),
                    status: "healthy".into(),
                    response_time: "10ms".into(),
                },
            ],
            slack_messages: vec![
                SlackMessage {
                    user: "alice".into(),
                    content: "Seeing timeouts on checkout".into(),
                    timestamp: "10:30".into(),
                },
                SlackMessage {
                    user: "bob".into(),
                    content: "DB connections maxed out".into(),
                    timestamp: "10:32".into(),
                },
            ],
            deployments: vec![Deployment {
                service: "web-app".into(),
                status: "success".into(),
                timestamp: "09:00".into(),
            }],
            logs: vec![
                LogRecord {
                    timestamp: "2025-07-20T10:31:00Z".into(),
                    level: "ERROR".into(),
                    service: "postgres".into(),
                    message: "Connection pool exhausted".into(),
                    metadata: json!({"pool_size": 20, "active_connections": 20}),
                },
                LogRecord {
                    timestamp: "2025-07-20T10:30:30Z".into(),
                    level: "WARN".into(),
                    service: "postgres".into(),
                    message: "High response time: 4500ms".into(),
                    metadata: json!({"query": "SELECT * FROM users"}),
                },
                LogRecord {
                    timestamp: "2025-07-20T10:30:00Z".into(),
                    level: "ERROR".into(),
                    service: "web-app".into(),
                    message: "Database timeout after 5000ms".into(),
                    metadata: json!({"endpoint": "/checkout"}),
                },
                LogRecord {
                    timestamp: "2025-07-20T10:29:45Z".into(),
                    level: "INFO".into(),
                    service: "postgres".into(),
                    message: "Connection pool at 95% capacity".into(),
                    metadata: json!({"pool_size": 20, "active_connections": 19}),
                },
                LogRecord {
                    timestamp: "2025-07-20T10:29:00Z".into(),
                    level: "WARN".into(),
                    service: "web-app".into(),
                    message: "Slow query detected: 3200ms".into(),
                    metadata: json!({"query_id": "q123"}),
                },
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::generate;

    #[test]
    fn scenario_is_deterministic() {
        let a = serde_json::to_value(generate()).unwrap();
        let b = serde_json::to_value(generate()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_tool_surface_has_signal() {
        let incident = generate();
        assert!(!incident.alert.is_empty());
        assert_eq!(incident.environment.dependencies.len(), 2);
        assert_eq!(incident.environment.slack_messages.len(), 2);
        assert_eq!(incident.environment.deployments.len(), 1);
        assert_eq!(incident.environment.logs.len(), 5);
    }
}
