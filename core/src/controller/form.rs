//! Controller behind the create/edit user form.
//!
//! # Design
//! The draft is a plain `User` mutated by input events and read back by the
//! view. The mode is fixed by `initialize`: edit mode never falls back to a
//! create, even when the record failed to load. Only a successful submit
//! navigates away; a failed one keeps the draft for another attempt.

use std::sync::Arc;

use tokio::sync::watch;

use super::{HasStatus, Outcome, RequestStatus, ViewState};
use crate::error::ApiError;
use crate::navigation::Navigator;
use crate::service::UserService;
use crate::types::{User, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// What the form view renders.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub draft: User,
    pub mode: FormMode,
    pub status: RequestStatus,
}

impl HasStatus for FormState {
    fn status_mut(&mut self) -> &mut RequestStatus {
        &mut self.status
    }
}

/// Create/edit form. The draft survives failed submissions so the user can
/// retry without re-entering anything.
pub struct UserFormController {
    service: UserService,
    navigator: Arc<dyn Navigator>,
    state: ViewState<FormState>,
}

impl UserFormController {
    pub fn new(service: UserService, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            service,
            navigator,
            state: ViewState::new("user-form", FormState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FormState {
        self.state.snapshot()
    }

    pub fn draft(&self) -> User {
        self.state.read(|s| s.draft.clone())
    }

    pub fn mode(&self) -> FormMode {
        self.state.read(|s| s.mode)
    }

    pub fn dispose(&self) {
        self.state.dispose();
    }

    /// `Some(id)` opens the form in edit mode and loads the record; a failed
    /// load keeps edit mode and the default draft. `None` opens an empty
    /// create form.
    pub async fn initialize(&self, id: Option<UserId>) -> Result<Outcome, ApiError> {
        let request = match self.state.begin() {
            Ok(request) => request,
            Err(outcome) => return Ok(outcome),
        };
        let Some(id) = id else {
            return Ok(request.settle(|s| {
                s.mode = FormMode::Create;
                s.draft = User::default();
            }));
        };

        self.state.modify(|s| s.mode = FormMode::Edit);
        match self.service.get_by_id(id).await {
            Ok(user) => Ok(request.settle(|s| s.draft = user)),
            Err(error) => request.fail(error),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.modify(|s| s.draft.name = name);
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.state.modify(|s| s.draft.email = email);
    }

    /// Apply an arbitrary user edit to the draft. The id is not editable.
    /// The closure runs on a copy, outside the state lock, so it may read
    /// the controller.
    pub fn edit_draft(&self, edit: impl FnOnce(&mut User)) {
        let mut draft = self.draft();
        let id = draft.id;
        edit(&mut draft);
        draft.id = id;
        self.state.modify(|s| s.draft = draft);
    }

    /// Create or update depending on the mode, then navigate to the list.
    pub async fn submit(&self) -> Result<Outcome, ApiError> {
        let request = match self.state.begin() {
            Ok(request) => request,
            Err(outcome) => return Ok(outcome),
        };
        let (mode, draft) = self.state.read(|s| (s.mode, s.draft.clone()));
        if let Err(error) = check_required(&draft) {
            return request.fail(error);
        }

        let saved = match (mode, draft.id) {
            (FormMode::Edit, Some(id)) => self.service.update(id, &draft).await,
            (FormMode::Edit, None) => Err(ApiError::MissingId),
            (FormMode::Create, _) => self.service.create(&draft).await,
        };
        match saved {
            Ok(user) => {
                let outcome = request.settle(|s| s.draft = user);
                if outcome == Outcome::Applied {
                    self.navigator.navigate_to_list();
                }
                Ok(outcome)
            }
            Err(error) => request.fail(error),
        }
    }
}

fn check_required(draft: &User) -> Result<(), ApiError> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::MissingField { field: "name" });
    }
    if draft.email.trim().is_empty() {
        return Err(ApiError::MissingField { field: "email" });
    }
    Ok(())
}
