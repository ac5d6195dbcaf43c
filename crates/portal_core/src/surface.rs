//! Seams between the page controllers and whatever renders the page.

use shared::domain::{FieldId, FieldState, KeyPress, Notification};

/// Input and error display for the login form.
pub trait FormSurface: Send + Sync {
    fn field_value(&self, field: FieldId) -> String;
    fn set_field_value(&self, field: FieldId, value: &str);
    /// `None` hides the field's error text.
    fn set_field_error(&self, field: FieldId, message: Option<&str>);
    fn field_state(&self, field: FieldId) -> FieldState;
    fn set_field_state(&self, field: FieldId, state: FieldState);
    fn set_busy(&self, busy: bool);
}

/// Renders the single toast slot of a page.
pub trait NotificationSink: Send + Sync {
    fn display(&self, notification: &Notification);
    fn dismiss(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, page: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Allow,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Ignored,
    Handled,
    /// The host should trigger the form submit, as if the button was clicked.
    Submit,
}

/// Page-level callbacks a host registers instead of global listeners.
pub trait PageHandler: Send + Sync {
    fn on_leave_attempt(&self) -> LeaveDecision {
        LeaveDecision::Allow
    }

    fn on_key(&self, key: KeyPress) -> KeyResponse;
}
