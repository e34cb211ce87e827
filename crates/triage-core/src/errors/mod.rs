use thiserror::Error;

/// Protocol-level failures.
///
/// These are local to a single action and never fatal to the session. They
/// are distinct from in-band tool errors, which are *successful* tool
/// executions whose payload carries an `error` key and which still consume
/// budget.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Missing action")]
    MissingAction,

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("No system prompt provided")]
    MissingSystemPrompt,

    #[error("Environment completed")]
    EnvironmentCompleted,

    #[error("Max tool calls exceeded")]
    BudgetExhausted,

    #[error("Missing tool name")]
    MissingToolName,

    #[error("Already completed")]
    AlreadyCompleted,

    #[error("No diagnosis provided")]
    MissingDiagnosis,

    /// Host-side fault (storage open or seed). Not a caller mistake.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ProtocolError {
    /// HTTP-equivalent status for transport adapters.
    pub fn status(&self) -> u16 {
        match self {
            ProtocolError::Internal(_) => 500,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProtocolError;

    #[test]
    fn caller_faults_map_to_400() {
        assert_eq!(ProtocolError::BudgetExhausted.status(), 400);
        assert_eq!(ProtocolError::UnknownAction("nope".into()).status(), 400);
        assert_eq!(
            ProtocolError::Internal(anyhow::anyhow!("disk gone")).status(),
            500
        );
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            ProtocolError::EnvironmentCompleted.to_string(),
            "Environment completed"
        );
        assert_eq!(
            ProtocolError::BudgetExhausted.to_string(),
            "Max tool calls exceeded"
        );
        assert_eq!(
            ProtocolError::MissingToolName.to_string(),
            "Missing tool name"
        );
        assert_eq!(
            ProtocolError::AlreadyCompleted.to_string(),
            "Already completed"
        );
        assert_eq!(
            ProtocolError::UnknownAction("reboot".into()).to_string(),
            "Unknown action: reboot"
        );
    }
}
