use chrono::{NaiveDate, TimeZone, Utc};

use super::mock::MockAccount;
use crate::records::{
    CostCategory, Document, DocumentKind, Employee, FinancialRecord, Project, ProjectStatus,
    Task, TaskPriority, TaskStatus, Team,
};

/// Fixed data set served by the in-memory repositories.
pub struct SeedData {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub employees: Vec<Employee>,
    pub teams: Vec<Team>,
    pub documents: Vec<Document>,
    pub financials: Vec<FinancialRecord>,
    pub accounts: Vec<MockAccount>,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl SeedData {
    pub fn load() -> Self {
        Self {
            projects: projects(),
            tasks: tasks(),
            employees: employees(),
            teams: teams(),
            documents: documents(),
            financials: financials(),
            accounts: vec![MockAccount {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                display_name: "Site Administrator".to_string(),
            }],
        }
    }
}

fn projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            name: "Riverside Pedestrian Bridge".to_string(),
            location: "North bank, km 4".to_string(),
            client: "City Council".to_string(),
            status: ProjectStatus::Active,
            start_date: date(2026, 2, 2),
            end_date: Some(date(2027, 6, 30)),
            budget: 2_400_000.0,
            progress: 35,
            manager_id: Some("1".to_string()),
        },
        Project {
            id: "2".to_string(),
            name: "Hillcrest School Extension".to_string(),
            location: "Hillcrest district".to_string(),
            client: "Education Board".to_string(),
            status: ProjectStatus::Planning,
            start_date: date(2026, 9, 1),
            end_date: None,
            budget: 850_000.0,
            progress: 5,
            manager_id: Some("2".to_string()),
        },
        Project {
            id: "3".to_string(),
            name: "Harbour Road Resurfacing".to_string(),
            location: "Harbour Road".to_string(),
            client: "Port Authority".to_string(),
            status: ProjectStatus::Completed,
            start_date: date(2025, 4, 14),
            end_date: Some(date(2025, 11, 28)),
            budget: 410_000.0,
            progress: 100,
            manager_id: Some("1".to_string()),
        },
    ]
}

fn task(
    id: &str,
    project_id: &str,
    title: &str,
    status: TaskStatus,
    priority: TaskPriority,
    assignee_id: Option<&str>,
    due_date: Option<NaiveDate>,
) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        status,
        priority,
        assignee_id: assignee_id.map(str::to_string),
        due_date,
    }
}

fn tasks() -> Vec<Task> {
    vec![
        task("1", "1", "Pile driving, east abutment", TaskStatus::Completed, TaskPriority::High, Some("3"), Some(date(2026, 4, 10))),
        task("2", "1", "Deck formwork", TaskStatus::InProgress, TaskPriority::High, Some("3"), Some(date(2026, 11, 20))),
        task("3", "1", "Handrail fabrication order", TaskStatus::Pending, TaskPriority::Medium, Some("4"), Some(date(2027, 1, 15))),
        task("4", "2", "Soil survey", TaskStatus::Blocked, TaskPriority::Critical, Some("2"), Some(date(2026, 10, 1))),
        task("5", "2", "Building permit submission", TaskStatus::Pending, TaskPriority::High, Some("2"), Some(date(2026, 10, 15))),
        task("6", "3", "Final inspection", TaskStatus::Completed, TaskPriority::Medium, Some("1"), Some(date(2025, 11, 25))),
    ]
}

fn employees() -> Vec<Employee> {
    let employee = |id: &str, name: &str, role: &str, email: &str, team: Option<&str>, rate: f64| Employee {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        email: email.to_string(),
        phone: None,
        team_id: team.map(str::to_string),
        hourly_rate: rate,
        active: true,
    };

    vec![
        employee("1", "Marta Quintero", "Project manager", "marta.quintero@example.com", None, 62.0),
        employee("2", "Daniel Okafor", "Civil engineer", "daniel.okafor@example.com", Some("2"), 48.5),
        employee("3", "Luis Serrano", "Foreman", "luis.serrano@example.com", Some("1"), 38.0),
        employee("4", "Priya Nair", "Procurement officer", "priya.nair@example.com", Some("1"), 35.0),
        employee("5", "Tom Becker", "Equipment operator", "tom.becker@example.com", Some("1"), 31.0),
    ]
}

fn teams() -> Vec<Team> {
    vec![
        Team {
            id: "1".to_string(),
            name: "Bridge crew".to_string(),
            lead_id: Some("3".to_string()),
            member_ids: ids(&["3", "4", "5"]),
            project_id: Some("1".to_string()),
        },
        Team {
            id: "2".to_string(),
            name: "Design office".to_string(),
            lead_id: Some("2".to_string()),
            member_ids: ids(&["2"]),
            project_id: Some("2".to_string()),
        },
    ]
}

fn documents() -> Vec<Document> {
    let uploaded = |year: i32, month: u32, day: u32| {
        Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .unwrap_or_default()
    };

    vec![
        Document {
            id: "1".to_string(),
            project_id: "1".to_string(),
            title: "General arrangement drawings".to_string(),
            kind: DocumentKind::Blueprint,
            file_name: "bridge-ga-rev3.pdf".to_string(),
            size_bytes: 4_812_332,
            uploaded_by: Some("2".to_string()),
            uploaded_at: uploaded(2026, 1, 20),
        },
        Document {
            id: "2".to_string(),
            project_id: "1".to_string(),
            title: "Main works contract".to_string(),
            kind: DocumentKind::Contract,
            file_name: "contract-signed.pdf".to_string(),
            size_bytes: 1_204_551,
            uploaded_by: Some("1".to_string()),
            uploaded_at: uploaded(2026, 1, 28),
        },
        Document {
            id: "3".to_string(),
            project_id: "2".to_string(),
            title: "Geotechnical report".to_string(),
            kind: DocumentKind::Report,
            file_name: "geotech-hillcrest.pdf".to_string(),
            size_bytes: 2_301_020,
            uploaded_by: Some("2".to_string()),
            uploaded_at: uploaded(2026, 8, 12),
        },
    ]
}

fn financials() -> Vec<FinancialRecord> {
    let record = |id: &str, project: &str, category: CostCategory, description: &str, budgeted: f64, actual: f64, on: NaiveDate| FinancialRecord {
        id: id.to_string(),
        project_id: project.to_string(),
        category,
        description: description.to_string(),
        budgeted,
        actual,
        recorded_on: on,
    };

    vec![
        record("1", "1", CostCategory::Labor, "Site crew wages", 900_000.0, 340_000.0, date(2026, 9, 30)),
        record("2", "1", CostCategory::Materials, "Steel and concrete", 1_100_000.0, 420_500.0, date(2026, 9, 30)),
        record("3", "1", CostCategory::Equipment, "Crane hire", 250_000.0, 131_200.0, date(2026, 9, 30)),
        record("4", "2", CostCategory::Subcontract, "Geotechnical survey", 60_000.0, 64_750.0, date(2026, 9, 15)),
        record("5", "3", CostCategory::Materials, "Asphalt", 280_000.0, 268_900.0, date(2025, 11, 30)),
        record("6", "3", CostCategory::Overhead, "Traffic management", 90_000.0, 97_300.0, date(2025, 11, 30)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn references_point_at_seeded_records() {
        let seed = SeedData::load();
        let project_ids: HashSet<_> = seed.projects.iter().map(|p| p.id.as_str()).collect();
        let employee_ids: HashSet<_> = seed.employees.iter().map(|e| e.id.as_str()).collect();

        for task in &seed.tasks {
            assert!(project_ids.contains(task.project_id.as_str()), "task {}", task.id);
            if let Some(assignee) = &task.assignee_id {
                assert!(employee_ids.contains(assignee.as_str()), "task {}", task.id);
            }
        }
        for record in &seed.financials {
            assert!(project_ids.contains(record.project_id.as_str()));
        }
        for team in &seed.teams {
            assert!(team.member_ids.iter().all(|m| employee_ids.contains(m.as_str())));
        }
    }
}
