pub mod common;
pub mod courses_page;
pub mod dashboard_page;
pub mod enrollments_page;
pub mod login_page;
pub mod nav_bar;
pub mod portal_courses_page;
pub mod portal_page;
pub mod results_page;
pub mod students_page;

use dioxus::prelude::*;

use crate::backend::models::Session;
use crate::backend::notify::Toast;
use crate::backend::session::Theme;
use crate::backend::Services;

/// Reactive mirror of the shared services, provided once at the root.
#[derive(Clone, Copy)]
pub struct AppState {
    pub session: Signal<Option<Session>>,
    pub theme: Signal<Theme>,
    pub toasts: Signal<Vec<Toast>>,
    /// False until persisted state has been read. Guards wait on it so a
    /// reload does not bounce a signed-in user to the login page.
    pub ready: Signal<bool>,
}

impl AppState {
    pub fn new(services: &Services) -> Self {
        Self {
            session: use_signal(|| services.session.get()),
            theme: use_signal(|| services.session.theme()),
            toasts: use_signal(|| services.toaster.visible()),
            ready: use_signal(|| cfg!(not(target_arch = "wasm32"))),
        }
    }

    /// Email of the signed-in user, empty when signed out.
    pub fn email(&self) -> String {
        self.session.read().as_ref().map(|s| s.email.clone()).unwrap_or_default()
    }
}
