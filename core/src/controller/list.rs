//! Controller behind the user list view.
//!
//! # Design
//! The list is a cache of the last successful `list_all`. Mutations never
//! patch it: a delete is followed by a full refetch, issued only once the
//! delete has succeeded, so the reload always observes the deletion.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::{HasStatus, InFlight, Outcome, RequestStatus, ViewState};
use crate::error::ApiError;
use crate::navigation::Navigator;
use crate::service::UserService;
use crate::types::{User, UserId};

/// What the list view renders.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Last successful fetch, in backend order.
    pub users: Vec<User>,
    pub status: RequestStatus,
}

impl HasStatus for ListState {
    fn status_mut(&mut self) -> &mut RequestStatus {
        &mut self.status
    }
}

/// Holds the fetched users and reloads them after every mutation. The list
/// is only ever replaced wholesale by a successful fetch.
pub struct UserListController {
    service: UserService,
    navigator: Arc<dyn Navigator>,
    state: ViewState<ListState>,
}

impl UserListController {
    pub fn new(service: UserService, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            service,
            navigator,
            state: ViewState::new("user-list", ListState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ListState {
        self.state.snapshot()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read(|s| s.users.clone())
    }

    /// Tear down: results arriving from now on are dropped.
    pub fn dispose(&self) {
        self.state.dispose();
    }

    /// Called once when the view becomes active.
    pub async fn activate(&self) -> Result<Outcome, ApiError> {
        self.reload().await
    }

    pub async fn reload(&self) -> Result<Outcome, ApiError> {
        match self.state.begin() {
            Ok(request) => self.fetch(request).await,
            Err(outcome) => Ok(outcome),
        }
    }

    /// Deletes `id`, then reloads. A failed delete leaves the list as it was.
    pub async fn request_delete(&self, id: UserId) -> Result<Outcome, ApiError> {
        let request = match self.state.begin() {
            Ok(request) => request,
            Err(outcome) => return Ok(outcome),
        };
        if let Err(error) = self.service.delete(id).await {
            return request.fail(error);
        }
        debug!(id, "delete confirmed, reloading");
        self.fetch(request).await
    }

    pub fn request_create_navigation(&self) {
        self.navigator.navigate_to_create();
    }

    pub fn request_edit_navigation(&self, id: UserId) {
        self.navigator.navigate_to_edit(id);
    }

    async fn fetch(&self, request: InFlight<'_, ListState>) -> Result<Outcome, ApiError> {
        match self.service.list_all().await {
            Ok(users) => Ok(request.settle(|s| s.users = users)),
            Err(error) => request.fail(error),
        }
    }
}
