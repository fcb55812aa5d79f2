//! Navigation seam between controllers and whatever owns the views.

use crate::types::UserId;

/// Receives navigation intents from the controllers. Implementations decide
/// what "navigating" means (router, terminal screen, test recorder).
pub trait Navigator: Send + Sync {
    fn navigate_to_list(&self);
    fn navigate_to_create(&self);
    fn navigate_to_edit(&self, id: UserId);
}
