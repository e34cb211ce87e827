pub mod envelope;

pub use envelope::{Action, ToolCallRequest};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::EnvironmentConfig;
use crate::errors::ProtocolError;
use crate::model::{DiagnosisResult, Incident};
use crate::prompt;
use crate::scoring;
use crate::storage::LogStore;
use crate::tools;

/// One live incident-diagnosis session.
///
/// A session is ACTIVE from creation until a successful diagnosis submission
/// makes it COMPLETED; there is no other terminal state. Failed operations
/// never change state. The only mutations are the pre-dispatch call-count
/// increment (never rolled back, even when the tool itself fails — burning
/// budget on failed attempts is intended), prompt replacement, and the final
/// completion flip.
pub struct Session {
    config: EnvironmentConfig,
    incident: Incident,
    system_prompt: String,
    log_store: Box<dyn LogStore>,
    tool_calls_made: u32,
    completed: bool,
}

impl Session {
    /// Create a session around a freshly generated incident, seeding the
    /// injected log store 1:1 from the incident's structured log records.
    pub fn new(incident: Incident, log_store: Box<dyn LogStore>) -> anyhow::Result<Self> {
        Self::with_config(EnvironmentConfig::default(), incident, log_store)
    }

    pub fn with_config(
        config: EnvironmentConfig,
        incident: Incident,
        mut log_store: Box<dyn LogStore>,
    ) -> anyhow::Result<Self> {
        for record in &incident.environment.logs {
            log_store.insert(record)?;
        }
        debug!(seeded = incident.environment.logs.len(), "session log store seeded");
        Ok(Self {
            config,
            incident,
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
            log_store,
            tool_calls_made: 0,
            completed: false,
        })
    }

    pub fn tool_calls_made(&self) -> u32 {
        self.tool_calls_made
    }

    pub fn calls_remaining(&self) -> u32 {
        self.config.max_tool_calls - self.tool_calls_made
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn incident(&self) -> &Incident {
        &self.incident
    }

    /// Dispatch one parsed action. Malformed input never mutates state.
    pub fn handle(&mut self, action: Action) -> Result<ActionResponse, ProtocolError> {
        match action {
            Action::GetInitialState => Ok(ActionResponse::InitialState(InitialState {
                incident_alert: self.incident.alert.clone(),
                max_tool_calls: self.config.max_tool_calls,
                calls_remaining: self.calls_remaining(),
            })),
            Action::GetTools => Ok(ActionResponse::Tools(ToolCatalog {
                tools: tools::definitions(),
            })),
            Action::GetSystemPrompt => Ok(ActionResponse::SystemPrompt(SystemPromptView {
                system_prompt: prompt::render(&self.system_prompt, &tools::definitions()),
            })),
            Action::UpdateSystemPrompt { system_prompt } => {
                self.update_system_prompt(system_prompt)
            }
            Action::UseTool(call) => self.use_tool(call),
            Action::SubmitDiagnosis { diagnosis } => self.submit_diagnosis(diagnosis),
        }
    }

    fn update_system_prompt(
        &mut self,
        system_prompt: Option<String>,
    ) -> Result<ActionResponse, ProtocolError> {
        let text = system_prompt
            .filter(|t| !t.is_empty())
            .ok_or(ProtocolError::MissingSystemPrompt)?;
        self.system_prompt = text;
        Ok(ActionResponse::Status(StatusMessage {
            status: "System prompt updated".to_string(),
        }))
    }

    fn use_tool(&mut self, call: ToolCallRequest) -> Result<ActionResponse, ProtocolError> {
        // Check precedence is part of the contract: a completed session
        // always reports completion and an exhausted one always reports
        // exhaustion, before any validation of the call itself.
        if self.completed {
            return Err(ProtocolError::EnvironmentCompleted);
        }
        if self.tool_calls_made >= self.config.max_tool_calls {
            return Err(ProtocolError::BudgetExhausted);
        }
        let name = call
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(ProtocolError::MissingToolName)?;

        self.tool_calls_made += 1;
        let tool_response = tools::dispatch(
            &self.incident,
            self.log_store.as_ref(),
            self.config.max_query_rows,
            name,
            &call.arguments,
        );
        debug!(tool = name, call_number = self.tool_calls_made, "tool call executed");
        Ok(ActionResponse::ToolUse(ToolUseOutcome {
            tool_response,
            calls_remaining: self.calls_remaining(),
            call_number: self.tool_calls_made,
        }))
    }

    fn submit_diagnosis(
        &mut self,
        diagnosis: Option<String>,
    ) -> Result<ActionResponse, ProtocolError> {
        if self.completed {
            return Err(ProtocolError::AlreadyCompleted);
        }
        // Reject before flipping `completed`: a malformed submission must
        // leave the session usable.
        let diagnosis = diagnosis.ok_or(ProtocolError::MissingDiagnosis)?;

        let score = scoring::score_diagnosis(
            &diagnosis,
            &self.incident.correct_diagnosis,
            self.tool_calls_made,
        );
        self.completed = true;
        info!(
            correct = score.correct,
            total_reward = score.total_reward,
            tool_calls = self.tool_calls_made,
            "diagnosis submitted"
        );
        Ok(ActionResponse::Diagnosis(DiagnosisResult {
            correct: score.correct,
            correct_diagnosis: self.incident.correct_diagnosis.clone(),
            agent_diagnosis: diagnosis,
            primary_reward: score.primary_reward,
            efficiency_reward: score.efficiency_reward,
            total_reward: score.total_reward,
            tool_calls_used: self.tool_calls_made,
            completed: true,
        }))
    }
}

/// Successful action responses, serialized untagged to the wire shapes the
/// caller sees.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    InitialState(InitialState),
    Tools(ToolCatalog),
    SystemPrompt(SystemPromptView),
    Status(StatusMessage),
    ToolUse(ToolUseOutcome),
    Diagnosis(DiagnosisResult),
}

#[derive(Debug, Serialize)]
pub struct InitialState {
    pub incident_alert: String,
    pub max_tool_calls: u32,
    pub calls_remaining: u32,
}

#[derive(Debug, Serialize)]
pub struct ToolCatalog {
    pub tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct SystemPromptView {
    pub system_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ToolUseOutcome {
    pub tool_response: Value,
    pub calls_remaining: u32,
    pub call_number: u32,
}
