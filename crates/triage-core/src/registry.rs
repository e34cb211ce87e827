use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::Value;
use tracing::info;

use crate::config::EnvironmentConfig;
use crate::errors::ProtocolError;
use crate::incident;
use crate::session::{Action, ActionResponse, Session};
use crate::storage::{LogStore, SqliteLogStore};

/// Factory producing one private log store per new session. The session key
/// is passed through so file-backed hosts can derive a location from it.
pub type StoreFactory = Box<dyn Fn(&str) -> anyhow::Result<Box<dyn LogStore>>>;

/// Process-wide keyed collection of sessions.
///
/// Each key owns exactly one lazily created session; two keys never observe
/// each other's state. Sessions live for the life of the registry — there is
/// no eviction. The host chooses the storage backend through the injected
/// factory.
pub struct SessionRegistry {
    config: EnvironmentConfig,
    store_factory: StoreFactory,
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    /// Registry whose sessions keep their log tables in memory.
    pub fn in_memory() -> Self {
        Self::new(
            EnvironmentConfig::default(),
            Box::new(|_key| Ok(Box::new(SqliteLogStore::open_in_memory()?) as Box<dyn LogStore>)),
        )
    }

    pub fn new(config: EnvironmentConfig, store_factory: StoreFactory) -> Self {
        Self {
            config,
            store_factory,
            sessions: HashMap::new(),
        }
    }

    /// Parse and dispatch one request envelope for the given session key,
    /// creating the session on first contact.
    pub fn handle(&mut self, key: &str, request: &Value) -> Result<ActionResponse, ProtocolError> {
        let action = Action::from_value(request)?;
        self.session_mut(key)?.handle(action)
    }

    pub fn session(&self, key: &str) -> Option<&Session> {
        self.sessions.get(key)
    }

    /// Resolve the session for a key, creating and seeding it if this is the
    /// key's first request.
    pub fn session_mut(&mut self, key: &str) -> Result<&mut Session, ProtocolError> {
        match self.sessions.entry(key.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let store = (self.store_factory)(key)?;
                let session = Session::with_config(self.config.clone(), incident::generate(), store)?;
                info!(session_key = key, "session created");
                Ok(entry.insert(session))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sessions_are_created_lazily() {
        let mut registry = SessionRegistry::in_memory();
        assert!(registry.is_empty());

        registry
            .handle("agent-1", &json!({ "action": "get_initial_state" }))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.session("agent-1").is_some());
        assert!(registry.session("agent-2").is_none());
    }

    #[test]
    fn unparseable_envelopes_do_not_create_sessions() {
        let mut registry = SessionRegistry::in_memory();
        let err = registry
            .handle("agent-1", &json!({ "action": "reboot" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: reboot");
        assert!(registry.is_empty());
    }

    #[test]
    fn keys_spend_budget_independently() {
        let mut registry = SessionRegistry::in_memory();
        let call = json!({
            "action": "use_tool",
            "tool_call": { "name": "check_dependencies", "arguments": {} }
        });
        registry.handle("a", &call).unwrap();
        registry.handle("a", &call).unwrap();
        registry.handle("b", &call).unwrap();

        assert_eq!(registry.session("a").unwrap().tool_calls_made(), 2);
        assert_eq!(registry.session("b").unwrap().tool_calls_made(), 1);
    }
}
