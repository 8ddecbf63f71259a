//! Screen state holders and the factory that builds them for the router.

pub mod factory;
pub mod load_state;

pub use factory::ViewModelFactory;
pub use load_state::{LoadState, LoadStatus, LoadTicket};

use crate::records::{Document, Employee, Project, Session, Task, Team};
use crate::services::{DashboardSummary, FinancialSummary};
use crate::ui::navigation::Route;

/// Data a screen renders once its load finished.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenData {
    /// Login screen; carries the active session, if any.
    Login(Option<Session>),
    Dashboard(DashboardSummary),
    Projects(Vec<Project>),
    Project(Project),
    Financials(FinancialSummary),
    Tasks(Vec<Task>),
    Task(Task),
    Employees(Vec<Employee>),
    Employee(Employee),
    Teams(Vec<Team>),
    Team(Team),
    Documents(Vec<Document>),
    Document(Document),
}

/// The state holder shown for one back-stack entry.
#[derive(Debug)]
pub struct Screen {
    route: Route,
    title: String,
    state: LoadState<ScreenData>,
}

impl Screen {
    pub fn new(route: Route) -> Self {
        let title = match &route {
            Route::TaskList(status) => format!("{} ({status})", route.kind().title()),
            other => match other.entity_id() {
                Some(id) => format!("{} #{id}", other.kind().title()),
                None => other.kind().title().to_string(),
            },
        };
        Self {
            route,
            title,
            state: LoadState::new(),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> &LoadState<ScreenData> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LoadState<ScreenData> {
        &mut self.state
    }

    /// Plain text rendering used by the shell.
    pub fn render(&self) -> String {
        let mut out = format!("== {} ==\n", self.title);
        match self.state.status() {
            LoadStatus::Idle => out.push_str("(not loaded)\n"),
            LoadStatus::Loading => out.push_str("Loading...\n"),
            LoadStatus::Failed(err) => out.push_str(&format!("Error: {err}\n")),
            LoadStatus::Loaded(data) => render_data(data, &mut out),
        }
        out
    }
}

fn render_data(data: &ScreenData, out: &mut String) {
    match data {
        ScreenData::Login(Some(session)) => {
            out.push_str(&format!("Signed in as {}\n", session.display_name));
        }
        ScreenData::Login(None) => out.push_str("Sign in with: login <user> <password>\n"),
        ScreenData::Dashboard(summary) => {
            out.push_str(&format!(
                "Projects: {} active / {} total\n",
                summary.active_projects, summary.total_projects
            ));
            out.push_str(&format!(
                "Tasks: {} open, {} blocked, {} overdue\n",
                summary.open_tasks, summary.blocked_tasks, summary.overdue_tasks
            ));
            out.push_str(&format!(
                "Staff: {} employees in {} teams\n",
                summary.employees, summary.teams
            ));
            out.push_str(&format!(
                "Budget: {:.2} spent of {:.2}\n",
                summary.total_spent, summary.total_budget
            ));
        }
        ScreenData::Projects(projects) => {
            list_lines(out, projects, |p| {
                format!("[{}] {} ({}, {}%)", p.id, p.name, p.status, p.progress)
            });
        }
        ScreenData::Project(p) => {
            out.push_str(&format!("{} for {}\n", p.name, p.client));
            out.push_str(&format!("Location: {}\n", p.location));
            out.push_str(&format!("Status: {}  Progress: {}%\n", p.status, p.progress));
            out.push_str(&format!("Budget: {:.2}\n", p.budget));
        }
        ScreenData::Financials(summary) => {
            out.push_str(&format!(
                "Budgeted {:.2}, actual {:.2} ({:.1}%), remaining {:.2}\n",
                summary.budgeted,
                summary.actual,
                summary.spent_ratio(),
                summary.remaining()
            ));
            for (category, totals) in &summary.by_category {
                out.push_str(&format!(
                    "  {category}: {:.2} / {:.2}\n",
                    totals.actual, totals.budgeted
                ));
            }
            if summary.over_budget_lines > 0 {
                out.push_str(&format!("{} line(s) over budget\n", summary.over_budget_lines));
            }
        }
        ScreenData::Tasks(tasks) => {
            list_lines(out, tasks, |t| format!("[{}] {} ({})", t.id, t.title, t.status));
        }
        ScreenData::Task(t) => {
            out.push_str(&format!("{} in project {}\n", t.title, t.project_id));
            out.push_str(&format!("Status: {}  Priority: {:?}\n", t.status, t.priority));
            if let Some(due) = t.due_date {
                out.push_str(&format!("Due: {due}\n"));
            }
        }
        ScreenData::Employees(employees) => {
            list_lines(out, employees, |e| format!("[{}] {} ({})", e.id, e.name, e.role));
        }
        ScreenData::Employee(e) => {
            out.push_str(&format!("{}, {}\n", e.name, e.role));
            out.push_str(&format!("Email: {}\n", e.email));
        }
        ScreenData::Teams(teams) => {
            list_lines(out, teams, |t| {
                format!("[{}] {} ({} members)", t.id, t.name, t.member_ids.len())
            });
        }
        ScreenData::Team(t) => {
            out.push_str(&format!("{}\n", t.name));
            out.push_str(&format!("Members: {}\n", t.member_ids.join(", ")));
        }
        ScreenData::Documents(documents) => {
            list_lines(out, documents, |d| format!("[{}] {} ({})", d.id, d.title, d.file_name));
        }
        ScreenData::Document(d) => {
            out.push_str(&format!("{} ({})\n", d.title, d.file_name));
            out.push_str(&format!("Uploaded {}\n", d.uploaded_at.format("%Y-%m-%d %H:%M")));
        }
    }
}

fn list_lines<T>(out: &mut String, items: &[T], line: impl Fn(&T) -> String) {
    if items.is_empty() {
        out.push_str("(none)\n");
    }
    for item in items {
        out.push_str(&line(item));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TaskStatus;

    #[test]
    fn titles_carry_the_parameter() {
        assert_eq!(Screen::new(Route::ProjectDetail("4".into())).title(), "Project #4");
        assert_eq!(
            Screen::new(Route::TaskList(TaskStatus::Blocked)).title(),
            "Tasks by Status (blocked)"
        );
        assert_eq!(Screen::new(Route::Teams).title(), "Teams");
    }

    #[test]
    fn render_reflects_load_state() {
        let mut screen = Screen::new(Route::Teams);
        assert!(screen.render().contains("not loaded"));

        let ticket = screen.state_mut().begin();
        assert!(screen.render().contains("Loading"));

        screen.state_mut().complete(ticket, Ok(ScreenData::Teams(Vec::new())));
        assert_eq!(screen.render(), "== Teams ==\n(none)\n");
    }
}
