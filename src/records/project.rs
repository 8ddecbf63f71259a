use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require_non_empty, require_non_negative, Entity, EntityId, ListFilter};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on hold",
            ProjectStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    pub client: String,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
    pub manager_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub location: String,
    pub client: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    pub manager_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EntityId>,
}

fn check_schedule(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
    match end {
        Some(end) if end < start => Err(AppError::validation(format!(
            "project end date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

impl Entity for Project {
    type Create = NewProject;
    type Patch = ProjectPatch;

    const KIND: &'static str = "project";
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create(id: EntityId, input: NewProject) -> Result<Self> {
        require_non_empty("project name", &input.name)?;
        require_non_negative("project budget", input.budget)?;
        check_schedule(input.start_date, input.end_date)?;

        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            location: input.location,
            client: input.client,
            status: ProjectStatus::Planning,
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
            progress: 0,
            manager_id: input.manager_id,
        })
    }

    fn apply_patch(&mut self, patch: ProjectPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            require_non_empty("project name", name)?;
        }
        if let Some(budget) = patch.budget {
            require_non_negative("project budget", budget)?;
        }
        if let Some(progress) = patch.progress {
            if progress > 100 {
                return Err(AppError::validation(format!(
                    "project progress must be between 0 and 100, got {progress}"
                )));
            }
        }
        if patch.end_date.is_some() {
            check_schedule(self.start_date, patch.end_date)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(manager_id) = patch.manager_id {
            self.manager_id = Some(manager_id);
        }
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.matches_project(Some(&self.id))
            && (filter.matches_search(&self.name) || filter.matches_search(&self.client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        Project::from_create(
            "1".to_string(),
            NewProject {
                name: "Riverside Bridge".to_string(),
                location: "North bank".to_string(),
                client: "City Council".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                end_date: None,
                budget: 1_200_000.0,
                manager_id: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_negative_budget_and_inverted_schedule() {
        let mut input = NewProject {
            name: "Depot".to_string(),
            location: String::new(),
            client: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()),
            budget: 10.0,
            manager_id: None,
        };
        assert!(Project::from_create("1".into(), input.clone()).is_err());

        input.end_date = None;
        input.budget = -1.0;
        assert!(Project::from_create("1".into(), input).is_err());
    }

    #[test]
    fn invalid_patch_leaves_record_untouched() {
        let mut project = sample();
        let before = project.clone();

        let err = project
            .apply_patch(ProjectPatch {
                name: Some("Renamed".to_string()),
                progress: Some(140),
                ..ProjectPatch::default()
            })
            .unwrap_err();

        assert!(err.to_string().contains("progress"));
        assert_eq!(project, before);
    }

    #[test]
    fn search_covers_name_and_client() {
        let project = sample();
        assert!(project.matches(&ListFilter::all().with_search("bridge")));
        assert!(project.matches(&ListFilter::all().with_search("council")));
        assert!(!project.matches(&ListFilter::all().with_search("tunnel")));
    }
}
