//! In-memory surfaces shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use shared::domain::{FieldId, FieldState, Notification};

use crate::surface::{FormSurface, Navigator, NotificationSink};

/// Lets spawned timer tasks run after the paused clock moved.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[derive(Default)]
pub struct RecordingSink {
    shown: Mutex<Vec<Notification>>,
    visible: Mutex<Option<Notification>>,
    dismissals: AtomicUsize,
}

impl RecordingSink {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.shown.lock().unwrap().last().cloned()
    }

    pub fn visible(&self) -> Option<Notification> {
        self.visible.lock().unwrap().clone()
    }

    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

impl NotificationSink for RecordingSink {
    fn display(&self, notification: &Notification) {
        self.shown.lock().unwrap().push(notification.clone());
        *self.visible.lock().unwrap() = Some(notification.clone());
    }

    fn dismiss(&self) {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
        *self.visible.lock().unwrap() = None;
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pages: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn pages(&self) -> Vec<String> {
        self.pages.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, page: &str) {
        self.pages.lock().unwrap().push(page.to_string());
    }
}

#[derive(Default)]
pub struct MemoryForm {
    values: Mutex<HashMap<FieldId, String>>,
    errors: Mutex<HashMap<FieldId, String>>,
    states: Mutex<HashMap<FieldId, FieldState>>,
    busy_history: Mutex<Vec<bool>>,
}

impl MemoryForm {
    pub fn filled(username: &str, student_number: &str, phone_number: &str) -> Self {
        let form = Self::default();
        form.set_field_value(FieldId::Username, username);
        form.set_field_value(FieldId::StudentNumber, student_number);
        form.set_field_value(FieldId::PhoneNumber, phone_number);
        form
    }

    pub fn error(&self, field: FieldId) -> Option<String> {
        self.errors.lock().unwrap().get(&field).cloned()
    }

    pub fn busy_history(&self) -> Vec<bool> {
        self.busy_history.lock().unwrap().clone()
    }
}

impl FormSurface for MemoryForm {
    fn field_value(&self, field: FieldId) -> String {
        self.values
            .lock()
            .unwrap()
            .get(&field)
            .cloned()
            .unwrap_or_default()
    }

    fn set_field_value(&self, field: FieldId, value: &str) {
        self.values.lock().unwrap().insert(field, value.to_string());
    }

    fn set_field_error(&self, field: FieldId, message: Option<&str>) {
        let mut errors = self.errors.lock().unwrap();
        match message {
            Some(message) => {
                errors.insert(field, message.to_string());
            }
            None => {
                errors.remove(&field);
            }
        }
    }

    fn field_state(&self, field: FieldId) -> FieldState {
        self.states
            .lock()
            .unwrap()
            .get(&field)
            .copied()
            .unwrap_or_default()
    }

    fn set_field_state(&self, field: FieldId, state: FieldState) {
        self.states.lock().unwrap().insert(field, state);
    }

    fn set_busy(&self, busy: bool) {
        self.busy_history.lock().unwrap().push(busy);
    }
}
