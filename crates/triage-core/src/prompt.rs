use serde_json::Value;

/// Literal token callers can keep in a custom prompt to have the serialized
/// tool catalog spliced in at read time.
pub const TOOL_DEFINITIONS_TOKEN: &str = "{TOOL_DEFINITIONS}";

/// Default system prompt handed to callers that have not installed their own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert on-call engineer responsible for diagnosing production incidents quickly and accurately.

Your goal is to identify the root cause of incidents using the available tools with maximum efficiency.

AVAILABLE TOOLS:
- check_dependencies: Check status of service dependencies
- check_slack: Search recent team Slack messages for context
- check_deployments: Check recent deployment history
- query_logs: Execute SQL queries on the observability logs database

{TOOL_DEFINITIONS}

CONSTRAINTS:
- You have a maximum of 10 tool calls to make your diagnosis
- You must submit a diagnosis before running out of tool calls
- Be efficient - you get bonus rewards for correct diagnoses with fewer tool calls

Your diagnosis should be concise and specific (e.g., \"database connection pool exhausted\", \"memory leak in web service\", \"network timeout to payment API\").

Remember: Accuracy is more important than speed, but efficiency is rewarded.";

/// Render a prompt template against the tool catalog.
pub fn render(template: &str, tools: &[Value]) -> String {
    let serialized = serde_json::to_string_pretty(tools).unwrap_or_else(|_| "[]".to_string());
    template.replace(TOOL_DEFINITIONS_TOKEN, &serialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools;

    #[test]
    fn default_prompt_carries_the_token() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains(TOOL_DEFINITIONS_TOKEN));
    }

    #[test]
    fn render_splices_the_catalog() {
        let rendered = render(DEFAULT_SYSTEM_PROMPT, &tools::definitions());
        assert!(!rendered.contains(TOOL_DEFINITIONS_TOKEN));
        assert!(rendered.contains("query_logs"));
        assert!(rendered.contains("check_dependencies"));
    }

    #[test]
    fn render_leaves_tokenless_templates_alone() {
        let rendered = render("diagnose fast", &tools::definitions());
        assert_eq!(rendered, "diagnose fast");
    }
}
