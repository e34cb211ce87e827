use serde_json::{json, Value};

use crate::errors::ProtocolError;

/// One parsed request envelope: `{action: string, ...}`.
///
/// Parsing is deliberately shallow. `use_tool` and `submit_diagnosis` keep
/// their payloads optional so the session can apply its own precondition
/// ordering (completed, then budget, then field validation) instead of
/// failing here out of order.
#[derive(Debug, Clone)]
pub enum Action {
    GetInitialState,
    GetTools,
    GetSystemPrompt,
    UpdateSystemPrompt { system_prompt: Option<String> },
    UseTool(ToolCallRequest),
    SubmitDiagnosis { diagnosis: Option<String> },
}

/// Transient tool invocation extracted from the envelope. Never stored.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    pub name: Option<String>,
    pub arguments: Value,
}

impl Action {
    /// Parse a request envelope, mapping absent and unrecognized `action`
    /// values to typed errors rather than a silent no-op.
    pub fn from_value(request: &Value) -> Result<Self, ProtocolError> {
        let action = request
            .get("action")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingAction)?;

        match action {
            "get_initial_state" => Ok(Action::GetInitialState),
            "get_tools" => Ok(Action::GetTools),
            "get_system_prompt" => Ok(Action::GetSystemPrompt),
            "update_system_prompt" => Ok(Action::UpdateSystemPrompt {
                system_prompt: string_field(request, "system_prompt"),
            }),
            "use_tool" => {
                let call = request.get("tool_call");
                Ok(Action::UseTool(ToolCallRequest {
                    name: call.and_then(|c| string_field(c, "name")),
                    arguments: call
                        .and_then(|c| c.get("arguments"))
                        .cloned()
                        .unwrap_or_else(|| json!({})),
                }))
            }
            "submit_diagnosis" => Ok(Action::SubmitDiagnosis {
                diagnosis: string_field(request, "diagnosis"),
            }),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_six_actions_parse() {
        for action in [
            "get_initial_state",
            "get_tools",
            "get_system_prompt",
            "update_system_prompt",
            "use_tool",
            "submit_diagnosis",
        ] {
            assert!(Action::from_value(&json!({ "action": action })).is_ok(), "{action}");
        }
    }

    #[test]
    fn missing_action_is_typed() {
        assert!(matches!(
            Action::from_value(&json!({})),
            Err(ProtocolError::MissingAction)
        ));
        assert!(matches!(
            Action::from_value(&json!({ "action": 7 })),
            Err(ProtocolError::MissingAction)
        ));
    }

    #[test]
    fn unknown_action_carries_the_name() {
        let err = Action::from_value(&json!({ "action": "reboot" })).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: reboot");
    }

    #[test]
    fn use_tool_survives_missing_pieces() {
        // name validation belongs to the session, after the completed and
        // budget checks, so parsing must not reject these
        let Action::UseTool(call) = Action::from_value(&json!({ "action": "use_tool" })).unwrap()
        else {
            panic!("expected UseTool");
        };
        assert!(call.name.is_none());
        assert_eq!(call.arguments, json!({}));

        let Action::UseTool(call) = Action::from_value(&json!({
            "action": "use_tool",
            "tool_call": { "name": "check_slack" }
        }))
        .unwrap() else {
            panic!("expected UseTool");
        };
        assert_eq!(call.name.as_deref(), Some("check_slack"));
        assert_eq!(call.arguments, json!({}));
    }

    #[test]
    fn tool_arguments_pass_through_untouched() {
        let Action::UseTool(call) = Action::from_value(&json!({
            "action": "use_tool",
            "tool_call": { "name": "query_logs", "arguments": { "sql_query": "SELECT 1" } }
        }))
        .unwrap() else {
            panic!("expected UseTool");
        };
        assert_eq!(call.arguments["sql_query"], "SELECT 1");
    }
}
