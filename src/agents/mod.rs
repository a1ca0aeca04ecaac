pub mod author;
pub mod investigator;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use author::{AuthorAgent, DraftInstructions};
pub use investigator::{Investigator, InvestigatorRole};

/// Outcome of one research agent run.
///
/// `data` is set exactly when `success` is true; `error` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReport {
    pub agent_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentReport {
    pub fn success(agent_name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn failure(agent_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A stateless researcher that turns a topic into a free-text report.
///
/// `run` never fails; problems are reported through [`AgentReport`].
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    /// Display name, e.g. "Detective Agent"
    fn name(&self) -> &str;

    async fn run(&self, topic: &str) -> AgentReport;
}
