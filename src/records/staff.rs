use serde::{Deserialize, Serialize};

use super::{require_non_empty, require_non_negative, Entity, EntityId, ListFilter};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EntityId,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: Option<String>,
    pub team_id: Option<EntityId>,
    pub hourly_rate: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: Option<String>,
    pub team_id: Option<EntityId>,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

fn check_email(email: &str) -> Result<()> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::validation(format!(
            "`{trimmed}` is not a valid email address"
        ))),
    }
}

impl Entity for Employee {
    type Create = NewEmployee;
    type Patch = EmployeePatch;

    const KIND: &'static str = "employee";
    const COLLECTION: &'static str = "employees";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create(id: EntityId, input: NewEmployee) -> Result<Self> {
        require_non_empty("employee name", &input.name)?;
        check_email(&input.email)?;
        require_non_negative("hourly rate", input.hourly_rate)?;

        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            role: input.role,
            email: input.email.trim().to_string(),
            phone: input.phone,
            team_id: input.team_id,
            hourly_rate: input.hourly_rate,
            active: true,
        })
    }

    fn apply_patch(&mut self, patch: EmployeePatch) -> Result<()> {
        if let Some(name) = &patch.name {
            require_non_empty("employee name", name)?;
        }
        if let Some(email) = &patch.email {
            check_email(email)?;
        }
        if let Some(rate) = patch.hourly_rate {
            require_non_negative("hourly rate", rate)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(team_id) = patch.team_id {
            self.team_id = Some(team_id);
        }
        if let Some(rate) = patch.hourly_rate {
            self.hourly_rate = rate;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter
            .team_id
            .as_deref()
            .map_or(true, |wanted| self.team_id.as_deref() == Some(wanted))
            && (filter.matches_search(&self.name) || filter.matches_search(&self.role))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub lead_id: Option<EntityId>,
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
    pub project_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    pub lead_id: Option<EntityId>,
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
    pub project_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_ids: Option<Vec<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
}

fn check_lead_is_member(lead_id: Option<&str>, members: &[EntityId]) -> Result<()> {
    match lead_id {
        Some(lead) if !members.iter().any(|member| member == lead) => Err(
            AppError::validation(format!("team lead `{lead}` must be one of the members")),
        ),
        _ => Ok(()),
    }
}

impl Entity for Team {
    type Create = NewTeam;
    type Patch = TeamPatch;

    const KIND: &'static str = "team";
    const COLLECTION: &'static str = "teams";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create(id: EntityId, input: NewTeam) -> Result<Self> {
        require_non_empty("team name", &input.name)?;
        check_lead_is_member(input.lead_id.as_deref(), &input.member_ids)?;

        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            lead_id: input.lead_id,
            member_ids: input.member_ids,
            project_id: input.project_id,
        })
    }

    fn apply_patch(&mut self, patch: TeamPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            require_non_empty("team name", name)?;
        }
        let lead = patch.lead_id.as_deref().or(self.lead_id.as_deref());
        let members = patch.member_ids.as_deref().unwrap_or(&self.member_ids);
        check_lead_is_member(lead, members)?;

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(lead_id) = patch.lead_id {
            self.lead_id = Some(lead_id);
        }
        if let Some(member_ids) = patch.member_ids {
            self.member_ids = member_ids;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = Some(project_id);
        }
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.matches_project(self.project_id.as_deref()) && filter.matches_search(&self.name)
    }
}
