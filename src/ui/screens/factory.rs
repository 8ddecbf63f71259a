use futures::future::{BoxFuture, FutureExt};

use super::{Screen, ScreenData};
use crate::error::Result;
use crate::records::ListFilter;
use crate::services::{aggregates, Repositories};
use crate::ui::navigation::{Route, ScreenBuilder};

/// Builds screens for the router and fetches the data each one shows.
#[derive(Clone)]
pub struct ViewModelFactory {
    repos: Repositories,
}

impl ViewModelFactory {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Fetch the data for `route`. The future owns its inputs so the caller can
    /// keep mutating the router while it runs.
    pub fn load(&self, route: &Route) -> BoxFuture<'static, Result<ScreenData>> {
        let repos = self.repos.clone();
        let route = route.clone();
        async move { fetch(&repos, &route).await }.boxed()
    }
}

impl ScreenBuilder for ViewModelFactory {
    type Screen = Screen;

    fn build(&self, route: &Route) -> Screen {
        Screen::new(route.clone())
    }
}

async fn fetch(repos: &Repositories, route: &Route) -> Result<ScreenData> {
    let all = ListFilter::all();
    let data = match route {
        Route::Login => ScreenData::Login(repos.auth.session().await?),
        Route::Dashboard => ScreenData::Dashboard(aggregates::load_dashboard(repos).await?),
        Route::Projects => ScreenData::Projects(repos.projects.list(&all).await?),
        Route::ProjectDetail(id) => ScreenData::Project(repos.projects.get(id).await?),
        Route::ProjectFinancials(id) => {
            ScreenData::Financials(aggregates::load_financials(repos, Some(id.as_str())).await?)
        }
        Route::Tasks => ScreenData::Tasks(repos.tasks.list(&all).await?),
        Route::TaskList(status) => {
            ScreenData::Tasks(repos.tasks.list(&all.with_status(*status)).await?)
        }
        Route::TaskDetail(id) => ScreenData::Task(repos.tasks.get(id).await?),
        Route::Employees => ScreenData::Employees(repos.employees.list(&all).await?),
        Route::EmployeeDetail(id) => ScreenData::Employee(repos.employees.get(id).await?),
        Route::Teams => ScreenData::Teams(repos.teams.list(&all).await?),
        Route::TeamDetail(id) => ScreenData::Team(repos.teams.get(id).await?),
        Route::Documents => ScreenData::Documents(repos.documents.list(&all).await?),
        Route::DocumentDetail(id) => ScreenData::Document(repos.documents.get(id).await?),
        Route::Financials => {
            ScreenData::Financials(aggregates::load_financials(repos, None).await?)
        }
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TaskStatus;
    use std::time::Duration;

    fn factory() -> ViewModelFactory {
        ViewModelFactory::new(Repositories::mock(Duration::ZERO))
    }

    #[tokio::test]
    async fn loads_detail_and_filtered_lists() {
        let factory = factory();

        match factory.load(&Route::ProjectDetail("2".into())).await.unwrap() {
            ScreenData::Project(project) => assert_eq!(project.id, "2"),
            other => panic!("unexpected data {other:?}"),
        }

        match factory.load(&Route::TaskList(TaskStatus::Blocked)).await.unwrap() {
            ScreenData::Tasks(tasks) => {
                assert!(tasks.iter().all(|task| task.status == TaskStatus::Blocked));
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_entity_is_not_found() {
        let err = factory()
            .load(&Route::EmployeeDetail("404".into()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn every_route_loads_from_seed_data() {
        let factory = factory();
        for path in [
            "login",
            "dashboard",
            "projects",
            "project_financials/1",
            "tasks",
            "task_detail/1",
            "employees",
            "teams",
            "team_detail/1",
            "documents",
            "document_detail/1",
            "financials",
        ] {
            let route: Route = path.parse().unwrap();
            assert!(factory.load(&route).await.is_ok(), "{path}");
        }
    }

    #[test]
    fn built_screens_start_idle() {
        let screen = factory().build(&Route::Dashboard);
        assert_eq!(screen.route(), &Route::Dashboard);
        assert!(screen.state().data().is_none());
        assert!(!screen.state().is_loading());
    }
}
