use crate::{
    agents::investigator::{DEFAULT_MIN_REPORT_CHARS, DEFAULT_RESEARCH_MODEL},
    agents::prompts::RESEARCH_SYSTEM_PROMPT,
    agents::{AgentReport, Investigator, ResearchAgent},
    llm::{CallWeight, GenerateRequest, ModelClient},
    schema::{parse_validated, response::research_data_schema},
    types::{AppError, ResearchData, Result},
};
use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

const DOSSIER_RULE_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Progress entry for one agent, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentState {
    pub agent_name: String,
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Receives the full, ordered agent list whenever any status changes.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, states: &[AgentState]);
}

impl<F> ProgressObserver for F
where
    F: Fn(&[AgentState]) + Send + Sync,
{
    fn on_progress(&self, states: &[AgentState]) {
        self(states)
    }
}

struct StatusBoard<'a> {
    states: Mutex<Vec<AgentState>>,
    observer: Option<&'a dyn ProgressObserver>,
}

impl<'a> StatusBoard<'a> {
    fn new(agents: &[Arc<dyn ResearchAgent>], observer: Option<&'a dyn ProgressObserver>) -> Self {
        let states = agents
            .iter()
            .map(|agent| AgentState {
                agent_name: agent.name().to_string(),
                status: AgentStatus::Pending,
                message: None,
            })
            .collect();
        Self {
            states: Mutex::new(states),
            observer,
        }
    }

    fn publish(&self) {
        if let Some(observer) = self.observer {
            let snapshot = self.states.lock().clone();
            observer.on_progress(&snapshot);
        }
    }

    fn set(&self, index: usize, status: AgentStatus, message: Option<String>) {
        {
            let mut states = self.states.lock();
            if let Some(state) = states.get_mut(index) {
                state.status = status;
                state.message = message;
            }
        }
        self.publish();
    }
}

/// Labels each successful report and joins them in the given order.
pub fn compile_dossier(reports: &[AgentReport]) -> String {
    let separator = format!("\n\n{}\n\n", "=".repeat(DOSSIER_RULE_WIDTH));
    reports
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| {
            r.data
                .as_deref()
                .map(|data| format!("{} REPORT:\n{}", r.agent_name.to_uppercase(), data))
        })
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Runs the research agents in parallel and synthesizes their reports into
/// a validated [`ResearchData`].
pub struct ResearchCoordinator {
    client: ModelClient,
    agents: Vec<Arc<dyn ResearchAgent>>,
    synthesis_model: String,
}

impl ResearchCoordinator {
    pub fn new(client: ModelClient, agents: Vec<Arc<dyn ResearchAgent>>) -> Self {
        Self {
            client,
            agents,
            synthesis_model: DEFAULT_RESEARCH_MODEL.to_string(),
        }
    }

    /// Coordinator with the Detective, Auditor, Insider and Statistician.
    pub fn with_default_agents(client: ModelClient) -> Self {
        let agents =
            Investigator::full_team(&client, DEFAULT_RESEARCH_MODEL, DEFAULT_MIN_REPORT_CHARS);
        Self::new(client, agents)
    }

    pub fn with_synthesis_model(mut self, model: impl Into<String>) -> Self {
        self.synthesis_model = model.into();
        self
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    /// Runs every agent to completion, then synthesizes.
    ///
    /// Fails with [`AppError::AllAgentsFailed`] only when no agent produced a
    /// report. The observer sees PENDING for every agent first, then each
    /// RUNNING and COMPLETED/FAILED transition.
    pub async fn perform_research(
        &self,
        topic: &str,
        case_study_count: u32,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<ResearchData> {
        let reports = self.gather_reports(topic, observer).await;

        let failed: Vec<&str> = reports
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.agent_name.as_str())
            .collect();
        if failed.len() == reports.len() {
            return Err(AppError::AllAgentsFailed(format!(
                "{} of {} agents returned no data",
                failed.len(),
                reports.len()
            )));
        }
        if !failed.is_empty() {
            warn!(failed = ?failed, "Some agents failed or returned no data");
        }

        let dossier = compile_dossier(&reports);
        self.synthesize(topic, &dossier, case_study_count).await
    }

    /// Runs all agents concurrently and returns their reports in declaration order.
    pub async fn gather_reports(
        &self,
        topic: &str,
        observer: Option<&dyn ProgressObserver>,
    ) -> Vec<AgentReport> {
        info!(topic, agents = self.agents.len(), "Deploying research agents");
        let board = StatusBoard::new(&self.agents, observer);
        board.publish();

        let runs = self.agents.iter().enumerate().map(|(index, agent)| {
            let board = &board;
            async move {
                board.set(index, AgentStatus::Running, None);
                let report = agent.run(topic).await;
                let report = if report.success && report.data.as_deref().map_or(true, str::is_empty)
                {
                    AgentReport::failure(report.agent_name, "agent returned no data")
                } else {
                    report
                };
                let status = if report.success {
                    AgentStatus::Completed
                } else {
                    AgentStatus::Failed
                };
                board.set(index, status, report.error.clone());
                report
            }
        });

        join_all(runs).await
    }

    async fn synthesize(
        &self,
        topic: &str,
        dossier: &str,
        case_study_count: u32,
    ) -> Result<ResearchData> {
        info!(topic, dossier_chars = dossier.len(), "Synthesizing forensic dossier");

        let prompt = format!(
            r#"Analyze the following FORENSIC DOSSIER on "{topic}" and consolidate it into a single research record.

FORENSIC DOSSIER:
{dossier}

REQUIREMENTS:
- Generate exactly {count} case studies.
- Where reports conflict, prefer the Detective and the Auditor."#,
            topic = topic,
            dossier = dossier,
            count = case_study_count,
        );

        let request = GenerateRequest::new(&self.synthesis_model)
            .with_system_instruction(RESEARCH_SYSTEM_PROMPT)
            .with_user_text(prompt)
            .with_json_schema(research_data_schema());

        let response = self.client.generate(&request, CallWeight::Heavy).await?;
        let data: ResearchData = parse_validated(&response.text())?;

        if data.case_studies.len() != case_study_count as usize {
            warn!(
                requested = case_study_count,
                returned = data.case_studies.len(),
                "Synthesis returned a different number of case studies"
            );
        }
        info!(
            ethical_rating = data.ethical_rating,
            case_studies = data.case_studies.len(),
            "Research complete"
        );
        Ok(data)
    }
}
