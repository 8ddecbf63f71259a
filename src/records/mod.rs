//! Domain records exchanged with the backend and held by the repositories.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod document;
pub mod financial;
pub mod project;
pub mod session;
pub mod staff;
pub mod task;

pub use document::{Document, DocumentKind, DocumentPatch, NewDocument};
pub use financial::{CostCategory, FinancialPatch, FinancialRecord, NewFinancialRecord};
pub use project::{NewProject, Project, ProjectPatch, ProjectStatus};
pub use session::{Credentials, Session};
pub use staff::{Employee, EmployeePatch, NewEmployee, NewTeam, Team, TeamPatch};
pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};

pub type EntityId = String;

/// Common surface of every record a repository can store.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Create: Clone + Send + Sync + Serialize + 'static;
    type Patch: Clone + Send + Sync + Serialize + 'static;

    /// Singular name used in errors and logs.
    const KIND: &'static str;
    /// Collection segment of the REST endpoint (`/api/{collection}`).
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Build a record from a create input, rejecting invalid input.
    fn from_create(id: EntityId, input: Self::Create) -> Result<Self>;

    /// Apply a partial update. The record is left untouched when the patch is invalid.
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<()>;

    fn matches(&self, filter: &ListFilter) -> bool;
}

/// Filters accepted by `list`. Fields that do not apply to a record kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub project_id: Option<EntityId>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<EntityId>,
    pub team_id: Option<EntityId>,
    pub search: Option<String>,
}

impl ListFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_project(project_id: impl Into<EntityId>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query parameters for the remote API, in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(project_id) = &self.project_id {
            query.push(("projectId", project_id.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(assignee_id) = &self.assignee_id {
            query.push(("assigneeId", assignee_id.clone()));
        }
        if let Some(team_id) = &self.team_id {
            query.push(("teamId", team_id.clone()));
        }
        if let Some(search) = &self.search {
            query.push(("q", search.clone()));
        }
        query
    }

    pub(crate) fn matches_search(&self, text: &str) -> bool {
        match &self.search {
            Some(needle) if !needle.trim().is_empty() => text
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            _ => true,
        }
    }

    pub(crate) fn matches_project(&self, project_id: Option<&str>) -> bool {
        match &self.project_id {
            Some(wanted) => project_id == Some(wanted.as_str()),
            None => true,
        }
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(crate::error::AppError::validation(format!(
            "{field} must not be empty"
        )))
    } else {
        Ok(())
    }
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(crate::error::AppError::validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_keeps_declared_order() {
        let filter = ListFilter::for_project("4")
            .with_status(TaskStatus::InProgress)
            .with_search("slab");

        assert_eq!(
            filter.to_query(),
            vec![
                ("projectId", "4".to_string()),
                ("status", "in_progress".to_string()),
                ("q", "slab".to_string()),
            ]
        );
    }

    #[test]
    fn blank_search_matches_everything() {
        let filter = ListFilter::all().with_search("   ");
        assert!(filter.matches_search("Bridge deck"));
        assert!(ListFilter::all().with_search("DECK").matches_search("Bridge deck"));
        assert!(!ListFilter::all().with_search("tunnel").matches_search("Bridge deck"));
    }
}
