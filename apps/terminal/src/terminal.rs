//! Renders page surfaces as plain terminal output.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use portal_core::{FormSurface, Navigator, NotificationSink};
use shared::domain::{FieldId, FieldState, Notification, NotificationKind};
use tokio::sync::watch;
use tracing::debug;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "✖",
        NotificationKind::Warning => "▲",
        NotificationKind::Info => "ℹ",
    }
}

pub struct TerminalPage {
    name: &'static str,
    values: Mutex<HashMap<FieldId, String>>,
    errors: Mutex<HashMap<FieldId, String>>,
    states: Mutex<HashMap<FieldId, FieldState>>,
    navigation: watch::Sender<Option<String>>,
}

impl TerminalPage {
    pub fn new(name: &'static str) -> (Self, watch::Receiver<Option<String>>) {
        let (navigation, navigation_rx) = watch::channel(None);
        let page = Self {
            name,
            values: Mutex::new(HashMap::new()),
            errors: Mutex::new(HashMap::new()),
            states: Mutex::new(HashMap::new()),
            navigation,
        };
        (page, navigation_rx)
    }

    pub fn print_form(&self) {
        let values = lock(&self.values);
        let errors = lock(&self.errors);
        let states = lock(&self.states);

        for field in FieldId::ALL {
            let state = states.get(&field).copied().unwrap_or_default();
            let marker = if state.focused { '>' } else { ' ' };
            println!(
                "{marker} {:<8} [{}]",
                field.label(),
                values.get(&field).map(String::as_str).unwrap_or("")
            );
            if let Some(message) = errors.get(&field) {
                println!("    ! {message}");
            }
        }
    }
}

impl FormSurface for TerminalPage {
    fn field_value(&self, field: FieldId) -> String {
        lock(&self.values).get(&field).cloned().unwrap_or_default()
    }

    fn set_field_value(&self, field: FieldId, value: &str) {
        lock(&self.values).insert(field, value.to_string());
    }

    fn set_field_error(&self, field: FieldId, message: Option<&str>) {
        let mut errors = lock(&self.errors);
        match message {
            Some(message) => {
                println!("    ! {}: {message}", field.label());
                errors.insert(field, message.to_string());
            }
            None => {
                errors.remove(&field);
            }
        }
    }

    fn field_state(&self, field: FieldId) -> FieldState {
        lock(&self.states).get(&field).copied().unwrap_or_default()
    }

    fn set_field_state(&self, field: FieldId, state: FieldState) {
        lock(&self.states).insert(field, state);
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            println!("[{}] 로그인 중...", self.name);
        }
    }
}

impl NotificationSink for TerminalPage {
    fn display(&self, notification: &Notification) {
        println!(
            "[{}] {} {}",
            notification.kind,
            icon(notification.kind),
            notification.message
        );
    }

    fn dismiss(&self) {
        debug!(page = self.name, "toast hidden");
    }
}

impl Navigator for TerminalPage {
    fn navigate(&self, page: &str) {
        println!("[{}] → {page}", self.name);
        self.navigation.send_replace(Some(page.to_string()));
    }
}
