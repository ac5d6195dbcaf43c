//! Login form controller: field lifecycle, submit gating, credential check.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::{
    domain::{FieldId, FieldState, Key, KeyPress, LoginAttempt, NotificationKind},
    error::ErrorCode,
    messages,
};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::{
    backend::{CredentialStore, LoginBackend},
    config::Settings,
    notifier::Notifier,
    surface::{FormSurface, KeyResponse, LeaveDecision, Navigator, PageHandler},
    validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Rejected,
    ValidationFailed,
    SystemError,
}

impl LoginOutcome {
    pub fn error_code(self) -> Option<ErrorCode> {
        match self {
            LoginOutcome::Success => None,
            LoginOutcome::Rejected => Some(ErrorCode::Rejected),
            LoginOutcome::ValidationFailed => Some(ErrorCode::Validation),
            LoginOutcome::SystemError => Some(ErrorCode::Internal),
        }
    }

    fn notification(self) -> (&'static str, NotificationKind) {
        match self {
            LoginOutcome::Success => (messages::LOGIN_SUCCESS, NotificationKind::Success),
            LoginOutcome::Rejected => (messages::LOGIN_REJECTED, NotificationKind::Error),
            LoginOutcome::ValidationFailed => (messages::CHECK_INPUT, NotificationKind::Error),
            LoginOutcome::SystemError => (messages::LOGIN_SYSTEM_ERROR, NotificationKind::Error),
        }
    }
}

/// Holds the submitting flag and busy indicator for one submit; releases both on drop.
struct SubmitGate<'a> {
    submitting: &'a AtomicBool,
    form: &'a dyn FormSurface,
}

impl<'a> SubmitGate<'a> {
    fn engage(submitting: &'a AtomicBool, form: &'a dyn FormSurface) -> Self {
        submitting.store(true, Ordering::SeqCst);
        form.set_busy(true);
        Self { submitting, form }
    }
}

impl Drop for SubmitGate<'_> {
    fn drop(&mut self) {
        self.submitting.store(false, Ordering::SeqCst);
        self.form.set_busy(false);
    }
}

pub struct LoginController {
    form: Arc<dyn FormSurface>,
    backend: Arc<dyn LoginBackend>,
    credentials: CredentialStore,
    notifier: Notifier,
    navigator: Arc<dyn Navigator>,
    redirect_page: String,
    redirect_delay: Duration,
    submitting: AtomicBool,
    leave_guard_armed: AtomicBool,
}

impl LoginController {
    pub fn new(
        settings: &Settings,
        form: Arc<dyn FormSurface>,
        backend: Arc<dyn LoginBackend>,
        notifier: Notifier,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            form,
            backend,
            credentials: CredentialStore::new(settings.credentials.clone()),
            notifier,
            navigator,
            redirect_page: settings.pages.main_menu.clone(),
            redirect_delay: settings.login_redirect_delay(),
            submitting: AtomicBool::new(false),
            leave_guard_armed: AtomicBool::new(true),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn leave_guard_armed(&self) -> bool {
        self.leave_guard_armed.load(Ordering::SeqCst)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn update_state(&self, field: FieldId, update: impl FnOnce(&mut FieldState)) {
        let mut state = self.form.field_state(field);
        update(&mut state);
        self.form.set_field_state(field, state);
    }

    fn render_error(&self, field: FieldId, message: Option<&str>) {
        self.form.set_field_error(field, message);
        self.update_state(field, |state| state.error = message.is_some());
    }

    /// Validates one field and shows or clears its error.
    pub fn validate_field(&self, field: FieldId) -> bool {
        let result = validator::validate(field, &self.form.field_value(field));
        if result.valid {
            self.render_error(field, None);
        } else {
            self.render_error(field, Some(&result.message));
        }
        result.valid
    }

    /// Validates every field; each one is checked even after a failure.
    pub fn validate_all(&self) -> bool {
        FieldId::ALL
            .into_iter()
            .fold(true, |all_valid, field| self.validate_field(field) && all_valid)
    }

    pub fn on_focus(&self, field: FieldId) {
        self.update_state(field, |state| state.focused = true);
    }

    pub fn on_blur(&self, field: FieldId) {
        let has_value = !self.form.field_value(field).trim().is_empty();
        self.update_state(field, |state| {
            state.focused = false;
            state.has_value = has_value;
        });
        self.validate_field(field);
    }

    /// Keystroke in a field: hides a shown error and keeps the phone number formatted.
    pub fn on_input(&self, field: FieldId) {
        if self.form.field_state(field).error {
            self.render_error(field, None);
        }
        if field == FieldId::PhoneNumber {
            let formatted = validator::format_phone_input(&self.form.field_value(field));
            self.form.set_field_value(field, &formatted);
        }
    }

    pub fn clear_errors(&self) {
        for field in FieldId::ALL {
            self.render_error(field, None);
        }
    }

    fn read_attempt(&self) -> LoginAttempt {
        LoginAttempt::new(
            &self.form.field_value(FieldId::Username),
            &self.form.field_value(FieldId::StudentNumber),
            &self.form.field_value(FieldId::PhoneNumber),
        )
    }

    fn has_unsaved_input(&self) -> bool {
        FieldId::ALL
            .into_iter()
            .any(|field| !self.form.field_value(field).trim().is_empty())
    }

    fn report(&self, outcome: LoginOutcome) {
        let (message, kind) = outcome.notification();
        self.notifier.show(message, kind);
    }

    /// Runs one submission. Callers must not re-enter while [`Self::is_submitting`].
    pub async fn submit(&self) -> LoginOutcome {
        if !self.validate_all() {
            warn!("login form failed validation");
            self.report(LoginOutcome::ValidationFailed);
            return LoginOutcome::ValidationFailed;
        }

        let _gate = SubmitGate::engage(&self.submitting, self.form.as_ref());
        info!("submitting login");

        let outcome = match self.backend.round_trip().await {
            Ok(()) => {
                let attempt = self.read_attempt();
                if self.credentials.matches(&attempt) {
                    info!(username = %attempt.username, "login accepted");
                    LoginOutcome::Success
                } else {
                    warn!(username = %attempt.username, "login rejected");
                    LoginOutcome::Rejected
                }
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "login round trip failed");
                LoginOutcome::SystemError
            }
        };

        self.report(outcome);
        if outcome == LoginOutcome::Success {
            self.leave_guard_armed.store(false, Ordering::SeqCst);
            self.schedule_redirect();
        }

        outcome
    }

    fn schedule_redirect(&self) {
        let deadline = Instant::now() + self.redirect_delay;
        let navigator = Arc::clone(&self.navigator);
        let page = self.redirect_page.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            info!(page = %page, "redirecting after login");
            navigator.navigate(&page);
        });
    }
}

impl PageHandler for LoginController {
    fn on_leave_attempt(&self) -> LeaveDecision {
        if self.leave_guard_armed() && self.has_unsaved_input() {
            LeaveDecision::Confirm
        } else {
            LeaveDecision::Allow
        }
    }

    fn on_key(&self, key: KeyPress) -> KeyResponse {
        match key.key {
            Key::Enter if !key.has_modifier() => {
                let input_focused = FieldId::ALL
                    .into_iter()
                    .any(|field| self.form.field_state(field).focused);
                if !input_focused {
                    KeyResponse::Ignored
                } else if self.is_submitting() {
                    // the submit button is disabled
                    KeyResponse::Handled
                } else {
                    KeyResponse::Submit
                }
            }
            Key::Escape => {
                self.clear_errors();
                KeyResponse::Handled
            }
            _ => KeyResponse::Ignored,
        }
    }
}

#[cfg(test)]
#[path = "tests/login_tests.rs"]
mod tests;
