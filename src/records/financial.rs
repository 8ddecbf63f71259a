use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require_non_empty, require_non_negative, Entity, EntityId, ListFilter};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Labor,
    Materials,
    Equipment,
    Subcontract,
    Overhead,
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CostCategory::Labor => "labor",
            CostCategory::Materials => "materials",
            CostCategory::Equipment => "equipment",
            CostCategory::Subcontract => "subcontract",
            CostCategory::Overhead => "overhead",
        })
    }
}

/// One budget line of a project with its spend to date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: EntityId,
    pub project_id: EntityId,
    pub category: CostCategory,
    pub description: String,
    pub budgeted: f64,
    pub actual: f64,
    pub recorded_on: NaiveDate,
}

impl FinancialRecord {
    pub fn variance(&self) -> f64 {
        self.budgeted - self.actual
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFinancialRecord {
    pub project_id: EntityId,
    pub category: CostCategory,
    pub description: String,
    pub budgeted: f64,
    #[serde(default)]
    pub actual: f64,
    pub recorded_on: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budgeted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
}

impl Entity for FinancialRecord {
    type Create = NewFinancialRecord;
    type Patch = FinancialPatch;

    const KIND: &'static str = "financial record";
    const COLLECTION: &'static str = "financials";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create(id: EntityId, input: NewFinancialRecord) -> Result<Self> {
        require_non_empty("financial project", &input.project_id)?;
        require_non_negative("budgeted amount", input.budgeted)?;
        require_non_negative("actual amount", input.actual)?;

        Ok(Self {
            id,
            project_id: input.project_id,
            category: input.category,
            description: input.description,
            budgeted: input.budgeted,
            actual: input.actual,
            recorded_on: input.recorded_on,
        })
    }

    fn apply_patch(&mut self, patch: FinancialPatch) -> Result<()> {
        if let Some(budgeted) = patch.budgeted {
            require_non_negative("budgeted amount", budgeted)?;
        }
        if let Some(actual) = patch.actual {
            require_non_negative("actual amount", actual)?;
        }

        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(budgeted) = patch.budgeted {
            self.budgeted = budgeted;
        }
        if let Some(actual) = patch.actual {
            self.actual = actual;
        }
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.matches_project(Some(&self.project_id)) && filter.matches_search(&self.description)
    }
}
