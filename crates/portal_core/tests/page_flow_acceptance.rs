use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use portal_core::{
    DashboardState, FormSurface, LeaveDecision, LoginController, LoginOutcome, Navigator,
    Notifier, NotificationSink, PageHandler, RandomDelays, Settings, SimulatedBackend,
};
use shared::domain::{FieldId, FieldState, Key, KeyPress, Notification, NotificationKind};

#[derive(Default)]
struct Page {
    values: Mutex<HashMap<FieldId, String>>,
    states: Mutex<HashMap<FieldId, FieldState>>,
    toasts: Mutex<Vec<Notification>>,
    visited: Mutex<Vec<String>>,
}

impl FormSurface for Page {
    fn field_value(&self, field: FieldId) -> String {
        self.values.lock().unwrap().get(&field).cloned().unwrap_or_default()
    }

    fn set_field_value(&self, field: FieldId, value: &str) {
        self.values.lock().unwrap().insert(field, value.to_string());
    }

    fn set_field_error(&self, _field: FieldId, _message: Option<&str>) {}

    fn field_state(&self, field: FieldId) -> FieldState {
        self.states.lock().unwrap().get(&field).copied().unwrap_or_default()
    }

    fn set_field_state(&self, field: FieldId, state: FieldState) {
        self.states.lock().unwrap().insert(field, state);
    }

    fn set_busy(&self, _busy: bool) {}
}

impl NotificationSink for Page {
    fn display(&self, notification: &Notification) {
        self.toasts.lock().unwrap().push(notification.clone());
    }

    fn dismiss(&self) {}
}

impl Navigator for Page {
    fn navigate(&self, page: &str) {
        self.visited.lock().unwrap().push(page.to_string());
    }
}

fn type_into(controller: &LoginController, page: &Page, field: FieldId, text: &str) {
    controller.on_focus(field);
    let mut typed = String::new();
    for c in text.chars() {
        typed.push(c);
        page.set_field_value(field, &typed);
        controller.on_input(field);
        typed = page.field_value(field);
    }
    controller.on_blur(field);
}

#[tokio::test(start_paused = true)]
async fn login_then_dashboard_round_trip() {
    let settings = Settings::default();
    let login_page = Arc::new(Page::default());
    let login = LoginController::new(
        &settings,
        login_page.clone(),
        Arc::new(SimulatedBackend::new(
            Arc::new(RandomDelays),
            settings.login_delay_range(),
        )),
        Notifier::new(login_page.clone(), settings.notification_ttl()),
        login_page.clone(),
    );

    type_into(&login, &login_page, FieldId::Username, "student");
    type_into(&login, &login_page, FieldId::StudentNumber, "2021001234");
    // typed without hyphens; the field formats itself
    type_into(&login, &login_page, FieldId::PhoneNumber, "01012345678");
    assert_eq!(login_page.field_value(FieldId::PhoneNumber), "010-1234-5678");
    assert_eq!(login.on_leave_attempt(), LeaveDecision::Confirm);

    login.on_focus(FieldId::PhoneNumber);
    assert_eq!(
        login.on_key(KeyPress::plain(Key::Enter)),
        portal_core::KeyResponse::Submit
    );

    let started = tokio::time::Instant::now();
    assert_eq!(login.submit().await, LoginOutcome::Success);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(1500) && waited < Duration::from_millis(2500));
    assert!(!login.is_submitting());
    assert_eq!(login.on_leave_attempt(), LeaveDecision::Allow);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(*login_page.visited.lock().unwrap(), vec!["mainmenu.html".to_string()]);

    let my_page = Arc::new(Page::default());
    let dashboard = Arc::new(DashboardState::new(
        &settings,
        Notifier::new(my_page.clone(), settings.notification_ttl()),
        my_page.clone(),
        Arc::new(RandomDelays),
    ));
    let _welcome = dashboard.spawn_welcome();
    let drift = dashboard.spawn_drift();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    dashboard.increment(2.0);

    tokio::time::sleep(Duration::from_secs(95)).await;
    drift.abort();

    let value = dashboard.value();
    assert!((38.2..=38.8).contains(&value), "{value}");

    let toasts = my_page.toasts.lock().unwrap().clone();
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts[0].kind, NotificationKind::Success);
    assert_eq!(toasts[1].message, "온도가 2.0°C 상승했습니다!");
}
