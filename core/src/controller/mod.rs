//! View controllers for the user list and the create/edit form.
//!
//! # Design
//! Controller methods take `&self` so a view can fire intents while an
//! earlier request is still pending. Each controller keeps its state in a
//! `watch` channel: the sender is the single source of truth, and
//! `subscribe()` hands the presentation layer a receiver that wakes on every
//! change. `ViewState` wraps the bookkeeping shared by both controllers:
//! - a request may only start while none is in flight (`Outcome::Busy`);
//! - a controller marked disposed drops late results (`Outcome::Discarded`)
//!   without applying them and without reporting their errors;
//! - a request whose future is dropped before it settles releases the
//!   in-flight flag, so the next call goes through.

mod form;
mod list;

pub use form::{FormMode, FormState, UserFormController};
pub use list::{ListState, UserListController};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ApiError;

/// How a controller call ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result was applied to the controller state.
    Applied,
    /// Another request was in flight; nothing was sent.
    Busy,
    /// The controller was disposed; the result was dropped.
    Discarded,
}

/// Request bookkeeping carried by every controller state.
#[derive(Debug, Clone, Default)]
pub struct RequestStatus {
    pub in_flight: bool,
    /// Last surfaced failure, cleared by the next applied result.
    pub error: Option<ApiError>,
    pub disposed: bool,
}

pub(crate) trait HasStatus {
    fn status_mut(&mut self) -> &mut RequestStatus;
}

pub(crate) struct ViewState<S> {
    view: &'static str,
    tx: watch::Sender<S>,
}

impl<S: HasStatus + Clone> ViewState<S> {
    pub(crate) fn new(view: &'static str, initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { view, tx }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.tx.borrow())
    }

    pub(crate) fn modify(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    pub(crate) fn dispose(&self) {
        self.tx.send_modify(|s| s.status_mut().disposed = true);
    }

    /// Mark a request as in flight, or explain why none may start. The
    /// returned guard clears the flag when dropped unsettled, so a caller
    /// that abandons the request leaves the controller usable.
    pub(crate) fn begin(&self) -> Result<InFlight<'_, S>, Outcome> {
        let mut refused = None;
        self.tx.send_if_modified(|s| {
            let status = s.status_mut();
            if status.disposed {
                refused = Some(Outcome::Discarded);
                return false;
            }
            if status.in_flight {
                refused = Some(Outcome::Busy);
                return false;
            }
            status.in_flight = true;
            true
        });
        match refused {
            Some(outcome) => Err(outcome),
            None => Ok(InFlight {
                state: self,
                settled: false,
            }),
        }
    }
}

/// A request started by `ViewState::begin`. Consumed by `settle` or `fail`.
pub(crate) struct InFlight<'a, S: HasStatus + Clone> {
    state: &'a ViewState<S>,
    settled: bool,
}

impl<S: HasStatus + Clone> InFlight<'_, S> {
    /// Clear the in-flight flag and apply a result unless disposed.
    pub(crate) fn settle(mut self, apply: impl FnOnce(&mut S)) -> Outcome {
        self.settled = true;
        let mut outcome = Outcome::Discarded;
        self.state.tx.send_modify(|s| {
            let status = s.status_mut();
            status.in_flight = false;
            if !status.disposed {
                status.error = None;
                apply(s);
                outcome = Outcome::Applied;
            }
        });
        outcome
    }

    /// Settle with a failure: record it for the view and hand it back.
    pub(crate) fn fail(self, error: ApiError) -> Result<Outcome, ApiError> {
        let view = self.state.view;
        let stored = error.clone();
        match self.settle(|s| s.status_mut().error = Some(stored)) {
            Outcome::Applied => {
                warn!(view, kind = ?error.kind(), %error, "request failed");
                Err(error)
            }
            outcome => Ok(outcome),
        }
    }
}

impl<S: HasStatus + Clone> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(view = self.state.view, "request abandoned");
            self.state.tx.send_modify(|s| s.status_mut().in_flight = false);
        }
    }
}
