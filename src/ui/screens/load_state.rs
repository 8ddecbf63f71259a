use crate::error::AppError;

/// Identifies one load started on a [`LoadState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Default)]
pub enum LoadStatus<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(AppError),
}

/// Data held by a screen plus the generation of the load that may update it.
///
/// Every `begin` hands out a new ticket; completions carrying an older ticket
/// are dropped so a slow fetch never overwrites a newer one.
#[derive(Debug, Default)]
pub struct LoadState<T> {
    status: LoadStatus<T>,
    generation: u64,
}

impl<T> LoadState<T> {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Idle,
            generation: 0,
        }
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        LoadTicket(self.generation)
    }

    /// Store the outcome of the load identified by `ticket`.
    /// Returns `false` and drops the result when the ticket is stale.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<T, AppError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = match result {
            Ok(data) => LoadStatus::Loaded(data),
            Err(err) => LoadStatus::Failed(err),
        };
        true
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation && matches!(self.status, LoadStatus::Loading)
    }

    pub fn status(&self) -> &LoadStatus<T> {
        &self.status
    }

    pub fn data(&self) -> Option<&T> {
        match &self.status {
            LoadStatus::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.status {
            LoadStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_completion_is_discarded() {
        let mut state = LoadState::new();
        let first = state.begin();
        let second = state.begin();

        assert!(!state.complete(first, Ok("old")));
        assert!(state.is_loading());

        assert!(state.complete(second, Ok("new")));
        assert_eq!(state.data(), Some(&"new"));

        // A ticket is only good once.
        assert!(!state.complete(second, Ok("again")));
        assert_eq!(state.data(), Some(&"new"));
    }

    #[test]
    fn failure_is_kept() {
        let mut state: LoadState<u32> = LoadState::new();
        let ticket = state.begin();
        state.complete(ticket, Err(AppError::not_found("project", "9")));

        assert!(state.error().is_some_and(AppError::is_not_found));
        assert!(state.data().is_none());
    }
}
