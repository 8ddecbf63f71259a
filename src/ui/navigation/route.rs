use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{EntityId, TaskStatus};

/// Substituted for a missing or malformed entity id under [`ParamPolicy::Fallback`].
pub const DEFAULT_ENTITY_ID: &str = "1";
/// Substituted for a missing or malformed status under [`ParamPolicy::Fallback`].
pub const DEFAULT_TASK_STATUS: TaskStatus = TaskStatus::Pending;

/// What to do with a parameter segment that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamPolicy {
    /// Substitute the documented default and log a warning.
    #[default]
    Fallback,
    /// Reject the route with [`RouteError::MalformedParameter`].
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches `{0}`")]
    Unknown(String),
    #[error("malformed {param} `{value}` for route `{template}`")]
    MalformedParameter {
        template: &'static str,
        param: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    EntityId,
    Status,
}

impl ParamKind {
    fn placeholder(self) -> &'static str {
        match self {
            ParamKind::EntityId => "id",
            ParamKind::Status => "status",
        }
    }
}

/// Screen kinds, one per registered route template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Login,
    Dashboard,
    Projects,
    ProjectDetail,
    ProjectFinancials,
    Tasks,
    TaskList,
    TaskDetail,
    Employees,
    EmployeeDetail,
    Teams,
    TeamDetail,
    Documents,
    DocumentDetail,
    Financials,
}

impl RouteKind {
    pub const ALL: [RouteKind; 15] = [
        RouteKind::Login,
        RouteKind::Dashboard,
        RouteKind::Projects,
        RouteKind::ProjectDetail,
        RouteKind::ProjectFinancials,
        RouteKind::Tasks,
        RouteKind::TaskList,
        RouteKind::TaskDetail,
        RouteKind::Employees,
        RouteKind::EmployeeDetail,
        RouteKind::Teams,
        RouteKind::TeamDetail,
        RouteKind::Documents,
        RouteKind::DocumentDetail,
        RouteKind::Financials,
    ];

    /// First path segment identifying the screen.
    pub fn name(self) -> &'static str {
        match self {
            RouteKind::Login => "login",
            RouteKind::Dashboard => "dashboard",
            RouteKind::Projects => "projects",
            RouteKind::ProjectDetail => "project_detail",
            RouteKind::ProjectFinancials => "project_financials",
            RouteKind::Tasks => "tasks",
            RouteKind::TaskList => "task_list",
            RouteKind::TaskDetail => "task_detail",
            RouteKind::Employees => "employees",
            RouteKind::EmployeeDetail => "employee_detail",
            RouteKind::Teams => "teams",
            RouteKind::TeamDetail => "team_detail",
            RouteKind::Documents => "documents",
            RouteKind::DocumentDetail => "document_detail",
            RouteKind::Financials => "financials",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            RouteKind::ProjectDetail => "project_detail/{id}",
            RouteKind::ProjectFinancials => "project_financials/{id}",
            RouteKind::TaskList => "task_list/{status}",
            RouteKind::TaskDetail => "task_detail/{id}",
            RouteKind::EmployeeDetail => "employee_detail/{id}",
            RouteKind::TeamDetail => "team_detail/{id}",
            RouteKind::DocumentDetail => "document_detail/{id}",
            other => other.name(),
        }
    }

    /// Human readable label used by headers and logs.
    pub fn title(self) -> &'static str {
        match self {
            RouteKind::Login => "Sign In",
            RouteKind::Dashboard => "Dashboard",
            RouteKind::Projects => "Projects",
            RouteKind::ProjectDetail => "Project",
            RouteKind::ProjectFinancials => "Project Financials",
            RouteKind::Tasks => "Tasks",
            RouteKind::TaskList => "Tasks by Status",
            RouteKind::TaskDetail => "Task",
            RouteKind::Employees => "Employees",
            RouteKind::EmployeeDetail => "Employee",
            RouteKind::Teams => "Teams",
            RouteKind::TeamDetail => "Team",
            RouteKind::Documents => "Documents",
            RouteKind::DocumentDetail => "Document",
            RouteKind::Financials => "Financials",
        }
    }

    fn param(self) -> Option<ParamKind> {
        match self {
            RouteKind::TaskList => Some(ParamKind::Status),
            RouteKind::ProjectDetail
            | RouteKind::ProjectFinancials
            | RouteKind::TaskDetail
            | RouteKind::EmployeeDetail
            | RouteKind::TeamDetail
            | RouteKind::DocumentDetail => Some(ParamKind::EntityId),
            _ => None,
        }
    }

    pub fn is_parameterised(self) -> bool {
        self.param().is_some()
    }

    fn from_name(name: &str) -> Option<Self> {
        RouteKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A concrete route: a template with its parameter filled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Projects,
    ProjectDetail(EntityId),
    ProjectFinancials(EntityId),
    Tasks,
    TaskList(TaskStatus),
    TaskDetail(EntityId),
    Employees,
    EmployeeDetail(EntityId),
    Teams,
    TeamDetail(EntityId),
    Documents,
    DocumentDetail(EntityId),
    Financials,
}

impl Route {
    /// Parse a concrete route string such as `project_detail/42`.
    ///
    /// Unknown templates are always an error. A malformed or missing parameter
    /// is replaced by its default under [`ParamPolicy::Fallback`].
    pub fn parse(input: &str, policy: ParamPolicy) -> Result<Route, RouteError> {
        let (name, segment) = match input.split_once('/') {
            Some((name, segment)) => (name, Some(segment)),
            None => (input, None),
        };

        let kind =
            RouteKind::from_name(name).ok_or_else(|| RouteError::Unknown(input.to_string()))?;

        let Some(param) = kind.param() else {
            return match segment {
                None => Ok(Route::bare(kind)),
                Some(_) => Err(RouteError::Unknown(input.to_string())),
            };
        };

        let raw = segment.unwrap_or("");
        match param {
            ParamKind::EntityId => {
                let id = if is_valid_entity_id(raw) {
                    raw.to_string()
                } else {
                    fallback(kind, param, raw, policy, DEFAULT_ENTITY_ID)?.to_string()
                };
                Ok(Route::with_id(kind, id))
            }
            ParamKind::Status => {
                let status = match raw.parse::<TaskStatus>() {
                    Ok(status) => status,
                    Err(_) => {
                        fallback(kind, param, raw, policy, DEFAULT_TASK_STATUS.as_str())?;
                        DEFAULT_TASK_STATUS
                    }
                };
                Ok(Route::TaskList(status))
            }
        }
    }

    pub fn kind(&self) -> RouteKind {
        match self {
            Route::Login => RouteKind::Login,
            Route::Dashboard => RouteKind::Dashboard,
            Route::Projects => RouteKind::Projects,
            Route::ProjectDetail(_) => RouteKind::ProjectDetail,
            Route::ProjectFinancials(_) => RouteKind::ProjectFinancials,
            Route::Tasks => RouteKind::Tasks,
            Route::TaskList(_) => RouteKind::TaskList,
            Route::TaskDetail(_) => RouteKind::TaskDetail,
            Route::Employees => RouteKind::Employees,
            Route::EmployeeDetail(_) => RouteKind::EmployeeDetail,
            Route::Teams => RouteKind::Teams,
            Route::TeamDetail(_) => RouteKind::TeamDetail,
            Route::Documents => RouteKind::Documents,
            Route::DocumentDetail(_) => RouteKind::DocumentDetail,
            Route::Financials => RouteKind::Financials,
        }
    }

    /// Entity id carried by detail routes.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Route::ProjectDetail(id)
            | Route::ProjectFinancials(id)
            | Route::TaskDetail(id)
            | Route::EmployeeDetail(id)
            | Route::TeamDetail(id)
            | Route::DocumentDetail(id) => Some(id),
            _ => None,
        }
    }

    /// Concrete route string, the inverse of [`Route::parse`].
    pub fn path(&self) -> String {
        self.to_string()
    }

    fn bare(kind: RouteKind) -> Route {
        match kind {
            RouteKind::Login => Route::Login,
            RouteKind::Dashboard => Route::Dashboard,
            RouteKind::Projects => Route::Projects,
            RouteKind::Tasks => Route::Tasks,
            RouteKind::Employees => Route::Employees,
            RouteKind::Teams => Route::Teams,
            RouteKind::Documents => Route::Documents,
            RouteKind::Financials => Route::Financials,
            RouteKind::TaskList => Route::TaskList(DEFAULT_TASK_STATUS),
            parameterised => Route::with_id(parameterised, DEFAULT_ENTITY_ID.to_string()),
        }
    }

    fn with_id(kind: RouteKind, id: EntityId) -> Route {
        match kind {
            RouteKind::ProjectDetail => Route::ProjectDetail(id),
            RouteKind::ProjectFinancials => Route::ProjectFinancials(id),
            RouteKind::TaskDetail => Route::TaskDetail(id),
            RouteKind::EmployeeDetail => Route::EmployeeDetail(id),
            RouteKind::TeamDetail => Route::TeamDetail(id),
            RouteKind::DocumentDetail => Route::DocumentDetail(id),
            bare => Route::bare(bare),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind().name();
        match self {
            Route::TaskList(status) => write!(f, "{name}/{status}"),
            other => match other.entity_id() {
                Some(id) => write!(f, "{name}/{id}"),
                None => f.write_str(name),
            },
        }
    }
}

/// Parses leniently; use [`Route::parse`] to pick a policy.
impl FromStr for Route {
    type Err = RouteError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Route::parse(input, ParamPolicy::Fallback)
    }
}

fn is_valid_entity_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
}

fn fallback(
    kind: RouteKind,
    param: ParamKind,
    raw: &str,
    policy: ParamPolicy,
    default: &'static str,
) -> Result<&'static str, RouteError> {
    match policy {
        ParamPolicy::Fallback => {
            warn!(
                "Malformed {} `{}` for route `{}`, using default `{}`",
                param.placeholder(),
                raw,
                kind.template(),
                default
            );
            Ok(default)
        }
        ParamPolicy::Strict => Err(RouteError::MalformedParameter {
            template: kind.template(),
            param: param.placeholder(),
            value: raw.to_string(),
        }),
    }
}
