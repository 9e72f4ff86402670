//! Edit modals on the profile page and the username/email error lines they
//! contain.

use crate::profile::FieldCheck;
use serde::Serialize;
use tracing::debug;

/// Error line under one of the remotely checked inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSlot {
    Username,
    Email,
}

impl ErrorSlot {
    fn taken_message(self) -> &'static str {
        match self {
            Self::Username => "Username already exists",
            Self::Email => "Email already exists",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalSnapshot {
    pub active: Option<String>,
    pub username_error: Option<String>,
    pub email_error: Option<String>,
}

/// At most one modal is open; opening another replaces it.
#[derive(Debug, Default)]
pub struct ModalState {
    active: Option<String>,
    username_error: Option<String>,
    email_error: Option<String>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether the page body is locked behind a modal.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn error(&self, slot: ErrorSlot) -> Option<&str> {
        match slot {
            ErrorSlot::Username => self.username_error.as_deref(),
            ErrorSlot::Email => self.email_error.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: ErrorSlot) -> &mut Option<String> {
        match slot {
            ErrorSlot::Username => &mut self.username_error,
            ErrorSlot::Email => &mut self.email_error,
        }
    }

    pub fn open(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(target: "forms.modal", id = id.as_str(), "modal_opened");
        self.active = Some(id);
    }

    /// Close `id` and hide both error lines. The errors are cleared even when
    /// `id` was not the open modal. Returns whether `id` was open.
    pub fn close(&mut self, id: &str) -> bool {
        self.username_error = None;
        self.email_error = None;
        let was_open = self.active.as_deref() == Some(id);
        if was_open {
            self.active = None;
        }
        debug!(target: "forms.modal", id, was_open, "modal_closed");
        was_open
    }

    /// Escape closes the open modal the same way its close button does.
    pub fn escape(&mut self) -> Option<String> {
        let id = self.active.clone()?;
        self.close(&id);
        Some(id)
    }

    /// Backdrop click hides the modal but leaves the error lines alone.
    pub fn overlay_click(&mut self) -> Option<String> {
        let id = self.active.take()?;
        debug!(target: "forms.modal", id = id.as_str(), "modal_dismissed");
        Some(id)
    }

    /// Reflect a local username/email check in its error line. A value that
    /// still needs the server leaves the line as it was.
    pub fn apply_check(&mut self, slot: ErrorSlot, check: &FieldCheck) {
        match check {
            FieldCheck::Clear => *self.slot_mut(slot) = None,
            FieldCheck::Invalid(message) => *self.slot_mut(slot) = Some((*message).to_string()),
            FieldCheck::NeedsRemoteCheck(_) => {}
        }
    }

    /// Reflect the server's availability answer.
    pub fn apply_availability(&mut self, slot: ErrorSlot, exists: bool) {
        *self.slot_mut(slot) = exists.then(|| slot.taken_message().to_string());
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        ModalSnapshot {
            active: self.active.clone(),
            username_error: self.username_error.clone(),
            email_error: self.email_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{check_email, check_username};
    use pretty_assertions::assert_eq;

    fn with_errors() -> ModalState {
        let mut modals = ModalState::new();
        modals.open("editAccountModal");
        modals.apply_check(ErrorSlot::Username, &check_username("amina", "amina k"));
        modals.apply_check(ErrorSlot::Email, &check_email("a@b.co", "a@b"));
        modals
    }

    #[test]
    fn checks_fill_error_lines() {
        let modals = with_errors();
        assert_eq!(
            modals.error(ErrorSlot::Username),
            Some("Invalid characters in username")
        );
        assert_eq!(modals.error(ErrorSlot::Email), Some("Invalid email format"));
    }

    #[test]
    fn remote_check_keeps_previous_line() {
        let mut modals = with_errors();
        modals.apply_check(ErrorSlot::Username, &check_username("amina", "amina_k"));
        assert_eq!(
            modals.error(ErrorSlot::Username),
            Some("Invalid characters in username")
        );
        modals.apply_availability(ErrorSlot::Username, true);
        assert_eq!(modals.error(ErrorSlot::Username), Some("Username already exists"));
        modals.apply_availability(ErrorSlot::Username, false);
        assert_eq!(modals.error(ErrorSlot::Username), None);
    }

    #[test]
    fn close_clears_both_errors() {
        let mut modals = with_errors();
        assert!(modals.close("editAccountModal"));
        assert_eq!(
            modals.snapshot(),
            ModalSnapshot {
                active: None,
                username_error: None,
                email_error: None,
            }
        );
        assert!(!modals.is_open());
    }

    #[test]
    fn escape_closes_the_active_modal() {
        let mut modals = with_errors();
        assert_eq!(modals.escape(), Some("editAccountModal".to_string()));
        assert_eq!(modals.error(ErrorSlot::Email), None);
        assert_eq!(modals.escape(), None);
    }

    #[test]
    fn escape_without_modal_keeps_errors() {
        let mut modals = with_errors();
        modals.overlay_click();
        assert_eq!(modals.escape(), None);
        assert!(modals.error(ErrorSlot::Username).is_some());
    }

    #[test]
    fn overlay_click_keeps_errors() {
        let mut modals = with_errors();
        assert_eq!(modals.overlay_click(), Some("editAccountModal".to_string()));
        assert!(!modals.is_open());
        assert!(modals.error(ErrorSlot::Username).is_some());
        assert!(modals.error(ErrorSlot::Email).is_some());
    }

    #[test]
    fn opening_another_modal_replaces_the_first() {
        let mut modals = ModalState::new();
        modals.open("editAccountModal");
        modals.open("editPersonalModal");
        assert_eq!(modals.active(), Some("editPersonalModal"));
        assert!(!modals.close("editAccountModal"));
        assert_eq!(modals.active(), Some("editPersonalModal"));
    }
}
