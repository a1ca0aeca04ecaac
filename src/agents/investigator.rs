//! The four field researchers.
//!
//! Each investigator makes one search-grounded call and hands back free
//! text. Failures are captured in the [`AgentReport`] rather than returned
//! as errors so the coordinator can carry on with whoever succeeded.

use super::prompts::{AUDITOR_PROMPT, DETECTIVE_PROMPT, INSIDER_PROMPT, STATISTICIAN_PROMPT};
use super::{AgentReport, ResearchAgent};
use crate::llm::{CallWeight, GenerateRequest, ModelClient};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_RESEARCH_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MIN_REPORT_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestigatorRole {
    Detective,
    Auditor,
    Insider,
    Statistician,
}

impl InvestigatorRole {
    /// Declaration order; the dossier follows it.
    pub const ALL: [InvestigatorRole; 4] = [
        InvestigatorRole::Detective,
        InvestigatorRole::Auditor,
        InvestigatorRole::Insider,
        InvestigatorRole::Statistician,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InvestigatorRole::Detective => "Detective Agent",
            InvestigatorRole::Auditor => "Auditor Agent",
            InvestigatorRole::Insider => "Insider Agent",
            InvestigatorRole::Statistician => "Statistician Agent",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            InvestigatorRole::Detective => DETECTIVE_PROMPT,
            InvestigatorRole::Auditor => AUDITOR_PROMPT,
            InvestigatorRole::Insider => INSIDER_PROMPT,
            InvestigatorRole::Statistician => STATISTICIAN_PROMPT,
        }
    }

    fn focus(&self) -> &'static str {
        match self {
            InvestigatorRole::Detective => "VICTIMS and SCAMS",
            InvestigatorRole::Auditor => "HIDDEN COSTS, FEES and REFUNDS",
            InvestigatorRole::Insider => "AFFILIATES, GURUS and COMMISSION STRUCTURES",
            InvestigatorRole::Statistician => "HARD DATA, SUCCESS RATES and CHURN",
        }
    }

    pub fn user_prompt(&self, topic: &str) -> String {
        format!(
            "Investigate the topic: \"{}\". Find facts, figures and first-hand stories. Focus on {}.",
            topic,
            self.focus()
        )
    }
}

pub struct Investigator {
    role: InvestigatorRole,
    client: ModelClient,
    model: String,
    min_report_chars: usize,
}

impl Investigator {
    pub fn new(role: InvestigatorRole, client: ModelClient) -> Self {
        Self {
            role,
            client,
            model: DEFAULT_RESEARCH_MODEL.to_string(),
            min_report_chars: DEFAULT_MIN_REPORT_CHARS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_min_report_chars(mut self, chars: usize) -> Self {
        self.min_report_chars = chars;
        self
    }

    pub fn role(&self) -> InvestigatorRole {
        self.role
    }

    /// One investigator per role, in declaration order.
    pub fn full_team(
        client: &ModelClient,
        model: &str,
        min_report_chars: usize,
    ) -> Vec<Arc<dyn ResearchAgent>> {
        InvestigatorRole::ALL
            .iter()
            .map(|role| {
                Arc::new(
                    Investigator::new(*role, client.clone())
                        .with_model(model)
                        .with_min_report_chars(min_report_chars),
                ) as Arc<dyn ResearchAgent>
            })
            .collect()
    }

    async fn investigate(&self, topic: &str) -> Result<String> {
        let request = GenerateRequest::new(&self.model)
            .with_system_instruction(self.role.system_prompt())
            .with_user_text(self.role.user_prompt(topic))
            .with_google_search();

        let response = self.client.generate(&request, CallWeight::Light).await?;
        let text = response.text();
        let length = text.trim().chars().count();
        if length < self.min_report_chars {
            return Err(AppError::LLM(format!(
                "insufficient data returned ({} characters)",
                length
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl ResearchAgent for Investigator {
    fn name(&self) -> &str {
        self.role.name()
    }

    async fn run(&self, topic: &str) -> AgentReport {
        info!(agent = self.name(), topic, "Starting investigation");
        match self.investigate(topic).await {
            Ok(text) => {
                info!(agent = self.name(), chars = text.len(), "Investigation complete");
                AgentReport::success(self.name(), text)
            }
            Err(e) => {
                warn!(agent = self.name(), error = %e, "Investigation failed");
                AgentReport::failure(self.name(), e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockModelTransport;
    use crate::llm::{ModelResponse, RetryPolicy};

    fn client_returning(text: &'static str) -> ModelClient {
        let mut transport = MockModelTransport::new();
        transport
            .expect_generate_content()
            .withf(|req| !req.tools.is_empty() && req.generation_config.response_schema.is_none())
            .returning(move |_| Ok(ModelResponse::from_text(text)));
        ModelClient::new(Arc::new(transport), RetryPolicy::no_retries())
    }

    #[test]
    fn test_role_names_and_order() {
        let names: Vec<_> = InvestigatorRole::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "Detective Agent",
                "Auditor Agent",
                "Insider Agent",
                "Statistician Agent"
            ]
        );
    }

    #[test]
    fn test_user_prompt_mentions_topic() {
        let prompt = InvestigatorRole::Auditor.user_prompt("Dropshipping");
        assert!(prompt.contains("\"Dropshipping\""));
        assert!(prompt.contains("HIDDEN COSTS"));
    }

    #[tokio::test]
    async fn test_successful_report() {
        let agent = Investigator::new(
            InvestigatorRole::Detective,
            client_returning("Reddit thread: lost $4,000 on ads in six weeks."),
        );
        let report = agent.run("Dropshipping").await;
        assert!(report.success);
        assert_eq!(report.agent_name, "Detective Agent");
        assert!(report.data.unwrap().contains("$4,000"));
    }

    #[tokio::test]
    async fn test_short_text_is_a_failure() {
        let agent = Investigator::new(InvestigatorRole::Insider, client_returning("n/a"));
        let report = agent.run("Dropshipping").await;
        assert!(!report.success);
        assert!(report.data.is_none());
        assert!(report.error.unwrap().contains("insufficient data"));
    }
}
