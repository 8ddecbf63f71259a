use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use futures::try_join;
use serde::{Deserialize, Serialize};

use super::Repositories;
use crate::error::Result;
use crate::records::{
    CostCategory, EntityId, FinancialRecord, ListFilter, Project, ProjectStatus, Task, TaskStatus,
};

/// Figures shown on the landing screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_projects: usize,
    pub total_projects: usize,
    pub open_tasks: usize,
    pub blocked_tasks: usize,
    pub overdue_tasks: usize,
    pub employees: usize,
    pub teams: usize,
    pub total_budget: f64,
    pub total_spent: f64,
}

/// Budget against spend, optionally scoped to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub project_id: Option<EntityId>,
    pub budgeted: f64,
    pub actual: f64,
    pub by_category: BTreeMap<CostCategory, CategoryTotals>,
    pub over_budget_lines: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub budgeted: f64,
    pub actual: f64,
}

impl FinancialSummary {
    pub fn remaining(&self) -> f64 {
        self.budgeted - self.actual
    }

    /// Share of the budget already spent, in percent. Zero when nothing is budgeted.
    pub fn spent_ratio(&self) -> f64 {
        if self.budgeted > 0.0 {
            self.actual / self.budgeted * 100.0
        } else {
            0.0
        }
    }

    pub fn from_records(project_id: Option<EntityId>, records: &[FinancialRecord]) -> Self {
        let mut by_category: BTreeMap<CostCategory, CategoryTotals> = BTreeMap::new();
        let mut over_budget_lines = 0;

        for record in records {
            let totals = by_category.entry(record.category).or_default();
            totals.budgeted += record.budgeted;
            totals.actual += record.actual;
            if record.variance() < 0.0 {
                over_budget_lines += 1;
            }
        }

        Self {
            project_id,
            budgeted: records.iter().map(|record| record.budgeted).sum(),
            actual: records.iter().map(|record| record.actual).sum(),
            by_category,
            over_budget_lines,
        }
    }
}

impl DashboardSummary {
    pub fn compute(
        projects: &[Project],
        tasks: &[Task],
        employees: usize,
        teams: usize,
        financials: &[FinancialRecord],
        today: NaiveDate,
    ) -> Self {
        let open = |task: &&Task| task.status != TaskStatus::Completed;

        Self {
            active_projects: projects
                .iter()
                .filter(|project| project.status == ProjectStatus::Active)
                .count(),
            total_projects: projects.len(),
            open_tasks: tasks.iter().filter(open).count(),
            blocked_tasks: tasks
                .iter()
                .filter(|task| task.status == TaskStatus::Blocked)
                .count(),
            overdue_tasks: tasks
                .iter()
                .filter(open)
                .filter(|task| task.due_date.is_some_and(|due| due < today))
                .count(),
            employees,
            teams,
            total_budget: projects.iter().map(|project| project.budget).sum(),
            total_spent: financials.iter().map(|record| record.actual).sum(),
        }
    }
}

/// Fetch everything the dashboard needs concurrently and fold it into a summary.
pub async fn load_dashboard(repos: &Repositories) -> Result<DashboardSummary> {
    let all = ListFilter::all();
    let (projects, tasks, employees, teams, financials) = try_join!(
        repos.projects.list(&all),
        repos.tasks.list(&all),
        repos.employees.list(&all),
        repos.teams.list(&all),
        repos.financials.list(&all),
    )?;

    Ok(DashboardSummary::compute(
        &projects,
        &tasks,
        employees.len(),
        teams.len(),
        &financials,
        Local::now().date_naive(),
    ))
}

/// Company-wide totals, or one project's totals when `project_id` is given.
pub async fn load_financials(
    repos: &Repositories,
    project_id: Option<&str>,
) -> Result<FinancialSummary> {
    let filter = match project_id {
        Some(id) => {
            // Surface a missing project as NotFound rather than an empty summary.
            repos.projects.get(id).await?;
            ListFilter::for_project(id)
        }
        None => ListFilter::all(),
    };
    let records = repos.financials.list(&filter).await?;
    Ok(FinancialSummary::from_records(
        project_id.map(str::to_string),
        &records,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::SeedData;
    use std::time::Duration;

    #[test]
    fn financial_summary_groups_by_category() {
        let seed = SeedData::load();
        let summary = FinancialSummary::from_records(Some("3".to_string()), &seed.financials[4..]);

        assert_eq!(summary.budgeted, 370_000.0);
        assert_eq!(summary.actual, 366_200.0);
        assert_eq!(summary.over_budget_lines, 1);
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.by_category[&CostCategory::Overhead].actual, 97_300.0);
        assert!(summary.remaining() > 0.0);
    }

    #[test]
    fn empty_summary_has_zero_ratio() {
        let summary = FinancialSummary::from_records(None, &[]);
        assert_eq!(summary.spent_ratio(), 0.0);
    }

    #[test]
    fn dashboard_counts_overdue_open_tasks_only() {
        let seed = SeedData::load();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let summary = DashboardSummary::compute(&seed.projects, &seed.tasks, 5, 2, &seed.financials, today);

        assert_eq!(summary.total_projects, 3);
        assert_eq!(summary.active_projects, 1);
        assert_eq!(summary.open_tasks, 4);
        assert_eq!(summary.blocked_tasks, 1);
        // Soil survey (due 2026-10-01, blocked) and permit submission (due 2026-10-15).
        assert_eq!(summary.overdue_tasks, 2);
    }

    #[tokio::test]
    async fn project_financials_for_unknown_project_is_not_found() {
        let repos = Repositories::mock(Duration::ZERO);
        let err = load_financials(&repos, Some("99")).await.unwrap_err();
        assert!(err.is_not_found());

        let scoped = load_financials(&repos, Some("1")).await.unwrap();
        assert_eq!(scoped.budgeted, 2_250_000.0);
    }
}
