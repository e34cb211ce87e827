use serde::Deserialize;

/// Tunables for a simulated environment.
///
/// Defaults reproduce the scoring contract callers are trained against; the
/// knobs exist so a harness can shrink the budget or the query cap without
/// patching the crate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Tool invocations allowed before a diagnosis must be submitted.
    pub max_tool_calls: u32,
    /// Row cap on `query_logs` responses; larger result sets are truncated
    /// and flagged with a warning.
    pub max_query_rows: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            max_tool_calls: 10,
            max_query_rows: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EnvironmentConfig;

    #[test]
    fn defaults_match_contract() {
        let cfg = EnvironmentConfig::default();
        assert_eq!(cfg.max_tool_calls, 10);
        assert_eq!(cfg.max_query_rows, 50);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let cfg: EnvironmentConfig = serde_yaml::from_str("max_tool_calls: 3\n").unwrap();
        assert_eq!(cfg.max_tool_calls, 3);
        assert_eq!(cfg.max_query_rows, 50);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<EnvironmentConfig>("max_tool_cals: 3\n").is_err());
    }
}
