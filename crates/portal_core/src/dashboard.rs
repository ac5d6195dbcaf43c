//! "My page" controller: the temperature gauge plus page routing.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use shared::{
    domain::{Key, KeyPress, NotificationKind},
    messages,
};
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};

use crate::{
    config::{Pages, Settings},
    notifier::Notifier,
    surface::{KeyResponse, Navigator, PageHandler},
    timing::DelaySource,
};

pub const GAUGE_MIN: f64 = 0.0;
pub const GAUGE_MAX: f64 = 100.0;

fn clamp_gauge(value: f64) -> f64 {
    value.clamp(GAUGE_MIN, GAUGE_MAX)
}

pub fn format_gauge(value: f64) -> String {
    messages::one_decimal(value)
}

pub struct DashboardState {
    gauge: Mutex<f64>,
    notifier: Notifier,
    navigator: Arc<dyn Navigator>,
    delays: Arc<dyn DelaySource>,
    pages: Pages,
    drift_magnitude: f64,
    drift_interval: Duration,
    transition_delay: Duration,
    logout_delay: Duration,
    welcome_delay: Duration,
}

impl DashboardState {
    pub fn new(
        settings: &Settings,
        notifier: Notifier,
        navigator: Arc<dyn Navigator>,
        delays: Arc<dyn DelaySource>,
    ) -> Self {
        Self {
            gauge: Mutex::new(clamp_gauge(settings.initial_gauge)),
            notifier,
            navigator,
            delays,
            pages: settings.pages.clone(),
            drift_magnitude: settings.drift_magnitude,
            drift_interval: settings.drift_interval(),
            transition_delay: settings.transition_delay(),
            logout_delay: settings.logout_delay(),
            welcome_delay: settings.welcome_delay(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn value(&self) -> f64 {
        *self.gauge.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gauge text, always one decimal digit.
    pub fn display(&self) -> String {
        format_gauge(self.value())
    }

    /// Width of the gauge bar in percent.
    pub fn fill_percent(&self) -> f64 {
        clamp_gauge(self.value())
    }

    fn apply(&self, delta: f64) -> f64 {
        let mut gauge = self.gauge.lock().unwrap_or_else(PoisonError::into_inner);
        *gauge = clamp_gauge(*gauge + delta);
        *gauge
    }

    /// Adds `delta` and announces the change.
    pub fn increment(&self, delta: f64) -> f64 {
        if !delta.is_finite() {
            warn!(delta, "ignoring non-finite gauge delta");
            return self.value();
        }

        let value = self.apply(delta);
        info!(delta, value = %format_gauge(value), "gauge changed");
        if delta > 0.0 {
            self.notifier
                .show(messages::gauge_raised(delta), NotificationKind::Success);
        } else {
            self.notifier
                .show(messages::gauge_lowered(delta), NotificationKind::Warning);
        }
        value
    }

    /// Small random drift, without a notification.
    pub fn perturb(&self) -> f64 {
        let delta = self.delays.drift(self.drift_magnitude);
        let value = self.apply(delta);
        debug!(delta, value = %format_gauge(value), "gauge drifted");
        value
    }

    /// Runs [`Self::perturb`] every drift interval until the handle is aborted.
    pub fn spawn_drift(self: &Arc<Self>) -> JoinHandle<()> {
        let period = self.drift_interval;
        let first_tick = Instant::now() + period;
        let state = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            loop {
                ticker.tick().await;
                state.perturb();
            }
        })
    }

    pub fn spawn_welcome(&self) -> JoinHandle<()> {
        let deadline = Instant::now() + self.welcome_delay;
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            notifier.show(messages::WELCOME, NotificationKind::Success);
        })
    }

    fn schedule_navigation(&self, page: String, delay: Duration) {
        let deadline = Instant::now() + delay;
        let navigator = Arc::clone(&self.navigator);
        debug!(page = %page, delay_ms = delay.as_millis() as u64, "navigation scheduled");
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            info!(page = %page, "navigating");
            navigator.navigate(&page);
        });
    }

    /// Leaves for `page` once the fade-out transition has run.
    pub fn navigate_with_transition(&self, page: &str) {
        self.schedule_navigation(page.to_string(), self.transition_delay);
    }

    /// Navigation menu entries and group headers; entries without a page do nothing.
    pub fn open_nav_item(&self, page: Option<&str>) -> bool {
        match page {
            Some(page) => {
                self.navigate_with_transition(page);
                true
            }
            None => false,
        }
    }

    /// Quick-action cards route by tab first, then by their own page.
    pub fn open_quick_action(&self, tab: Option<&str>, page: Option<&str>) -> bool {
        let target = match tab {
            Some("usage") => Some(self.pages.usage_history.as_str()),
            Some("points") => Some(self.pages.points.as_str()),
            _ => page,
        };
        self.open_nav_item(target)
    }

    /// `confirmed` is the user's answer to the logout prompt.
    pub fn logout(&self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        info!("logging out");
        self.notifier.info(messages::LOGGING_OUT);
        self.schedule_navigation(
            self.pages.login.clone(),
            self.logout_delay + self.transition_delay,
        );
        true
    }
}

impl PageHandler for DashboardState {
    fn on_key(&self, key: KeyPress) -> KeyResponse {
        if !key.ctrl {
            return KeyResponse::Ignored;
        }

        let target = match key.key {
            Key::Char('h') => &self.pages.main_menu,
            Key::Char('u') => &self.pages.usage_history,
            Key::Char('p') => &self.pages.points,
            _ => return KeyResponse::Ignored,
        };
        self.navigate_with_transition(target);
        KeyResponse::Handled
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
