//! Page controllers for the campus portal front end.
//!
//! The login controller and the "my page" dashboard both talk to the rendered
//! page only through the traits in [`surface`], so a browser binding, a
//! terminal host and the tests can all drive the same logic.

pub mod backend;
pub mod config;
pub mod dashboard;
pub mod login;
pub mod notifier;
pub mod surface;
pub mod timing;
pub mod validator;

pub use backend::{CredentialStore, LoginBackend, SimulatedBackend, UnavailableBackend};
pub use config::{load_settings, Settings};
pub use dashboard::DashboardState;
pub use login::{LoginController, LoginOutcome};
pub use notifier::Notifier;
pub use surface::{
    FormSurface, KeyResponse, LeaveDecision, Navigator, NotificationSink, PageHandler,
};
pub use timing::{DelaySource, FixedDelays, RandomDelays};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
