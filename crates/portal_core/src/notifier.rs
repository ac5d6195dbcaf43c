//! Single-slot toast with auto-dismiss.
//!
//! A page owns one [`Notifier`]. Every `show` replaces whatever is on screen
//! and restarts the dismiss timer; only the newest toast can be dismissed by
//! its timer. Calls must happen inside a Tokio runtime.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::domain::{Notification, NotificationKind};
use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

use crate::surface::NotificationSink;

struct Active {
    notification: Notification,
    expires_at: Instant,
}

#[derive(Default)]
struct Slot {
    active: Option<Active>,
    generation: u64,
    pending_dismiss: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    ttl: Duration,
    slot: Arc<Mutex<Slot>>,
    // Orders sink calls. Taken before `slot`, and `slot` is never held across a sink call.
    render: Arc<Mutex<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, ttl: Duration) -> Self {
        Self {
            sink,
            ttl,
            slot: Arc::new(Mutex::new(Slot::default())),
            render: Arc::new(Mutex::new(())),
        }
    }

    /// Sinks may read [`Self::current`] while rendering, but must not call `show`.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        let notification = Notification::new(message, kind);
        let _render = lock(&self.render);

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            let generation = slot.generation;
            if let Some(previous) = slot.pending_dismiss.take() {
                previous.abort();
            }

            let expires_at = Instant::now() + self.ttl;
            slot.active = Some(Active {
                notification: notification.clone(),
                expires_at,
            });
            slot.pending_dismiss = Some(self.spawn_dismiss(generation, expires_at));
            generation
        };

        debug!(kind = %kind, message = %notification.message, generation, "showing notification");
        self.sink.display(&notification);
    }

    fn spawn_dismiss(&self, generation: u64, expires_at: Instant) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let shared_slot = Arc::clone(&self.slot);
        let render = Arc::clone(&self.render);
        tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            let _render = lock(&render);
            {
                let mut slot = lock(&shared_slot);
                if slot.generation != generation {
                    return;
                }
                slot.active = None;
                slot.pending_dismiss = None;
            }
            debug!(generation, "notification expired");
            sink.dismiss();
        })
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::default());
    }

    /// Shows with a free-form kind label; unknown labels render as info.
    pub fn show_labeled(&self, message: impl Into<String>, label: &str) {
        self.show(message, NotificationKind::from_label(label));
    }

    /// The toast currently on screen, if it has not expired.
    pub fn current(&self) -> Option<Notification> {
        let slot = lock(&self.slot);
        slot.active
            .as_ref()
            .filter(|active| Instant::now() < active.expires_at)
            .map(|active| active.notification.clone())
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;
