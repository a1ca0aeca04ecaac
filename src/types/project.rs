use super::{AppError, Book, GenSettings, ResearchData, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Version tag written into every project export.
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

pub const ORIGINAL_BRANCH_NAME: &str = "Original Draft";

// ============= Project Types =============

/// One drafted variant of a project's book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub settings: GenSettings,
    pub book: Book,
}

impl Branch {
    pub fn new(name: impl Into<String>, settings: GenSettings, book: Book) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            timestamp: Utc::now(),
            settings,
            book,
        }
    }

    /// Copy of this branch holding `book` instead.
    pub fn with_book(&self, book: Book) -> Self {
        Self {
            book,
            ..self.clone()
        }
    }
}

/// A topic, its research and every branch drafted from it.
///
/// The research is shared by all branches; each branch owns its book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub topic: String,
    pub research: Arc<ResearchData>,
    pub branches: Vec<Branch>,
}

impl Project {
    pub fn new(topic: impl Into<String>, research: ResearchData, first: Branch) -> Self {
        Self {
            topic: topic.into(),
            research: Arc::new(research),
            branches: vec![first],
        }
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    pub fn require_branch(&self, id: &str) -> Result<&Branch> {
        self.branch(id)
            .ok_or_else(|| AppError::NotFound(format!("branch '{}'", id)))
    }

    pub fn latest_branch(&self) -> Option<&Branch> {
        self.branches.last()
    }

    /// Name for the next branch: "Draft 2", "Draft 3", ...
    pub fn next_branch_name(&self) -> String {
        format!("Draft {}", self.branches.len() + 1)
    }

    /// New project value with `branch` appended.
    pub fn with_branch(&self, branch: Branch) -> Project {
        let mut next = self.clone();
        next.branches.push(branch);
        next
    }

    /// New project value with the branch of the same id swapped for `branch`.
    pub fn replace_branch(&self, branch: Branch) -> Result<Project> {
        let mut next = self.clone();
        let slot = next
            .branches
            .iter_mut()
            .find(|b| b.id == branch.id)
            .ok_or_else(|| AppError::NotFound(format!("branch '{}'", branch.id)))?;
        *slot = branch;
        Ok(next)
    }
}

/// Versioned on-disk form of a [`Project`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExport {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub project: Project,
}

impl ProjectExport {
    pub fn new(project: Project) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            project,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let export: ProjectExport = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidInput(format!("not a project export: {}", e)))?;
        if export.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(AppError::InvalidInput(format!(
                "unsupported export schema version {} (expected {})",
                export.schema_version, EXPORT_SCHEMA_VERSION
            )));
        }
        Ok(export)
    }
}
