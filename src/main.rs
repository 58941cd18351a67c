mod backend;
mod components;

use components::common::ToastStack;
use components::courses_page::CoursesPage;
use components::dashboard_page::AdminDashboard;
use components::enrollments_page::EnrollmentsPage;
use components::login_page::LoginPage;
use components::nav_bar::{AdminShell, Landing, NotFound, PortalShell};
use components::portal_courses_page::PortalCourses;
use components::portal_page::{PortalEnrollments, PortalHome};
use components::results_page::ResultsPage;
use components::students_page::StudentsPage;
use components::AppState;

use backend::config::AppConfig;
use backend::guard::Target;
use backend::session::Theme;
use backend::Services;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Landing {},
    #[route("/login")]
    LoginPage {},
    #[nest("/admin")]
        #[layout(AdminShell)]
            #[route("/")]
            AdminDashboard {},
            #[route("/courses")]
            CoursesPage {},
            #[route("/students")]
            StudentsPage {},
            #[route("/enrollments")]
            EnrollmentsPage {},
            #[route("/results")]
            ResultsPage {},
        #[end_layout]
    #[end_nest]
    #[nest("/portal")]
        #[layout(PortalShell)]
            #[route("/")]
            PortalHome {},
            #[route("/courses")]
            PortalCourses {},
            #[route("/enrollments")]
            PortalEnrollments {},
        #[end_layout]
    #[end_nest]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl From<Target> for Route {
    fn from(target: Target) -> Self {
        match target {
            Target::Login => Route::LoginPage {},
            Target::AdminHome => Route::AdminDashboard {},
            Target::PortalHome => Route::PortalHome {},
        }
    }
}

fn main() {
    init_tracing();
    dioxus::launch(App);
}

// The browser build logs through the Dioxus logger that `launch` installs.
#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_tracing() {}

#[component]
fn App() -> Element {
    let services = use_context_provider(|| Services::init(AppConfig::from_env()));
    let app_state = AppState::new(&services);
    use_context_provider(|| app_state);

    // Session changes from anywhere (sign-in, sign-out, another tab) land here.
    let session_services = services.clone();
    use_future(move || {
        let services = session_services.clone();
        let mut session = app_state.session;
        async move {
            let mut rx = services.session.subscribe();
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                services.api.reset_capabilities();
                session.set(next);
            }
        }
    });

    let toast_services = services.clone();
    use_future(move || {
        let toaster = toast_services.toaster.clone();
        let mut toasts = app_state.toasts;
        async move {
            let mut rx = toaster.subscribe();
            while rx.changed().await.is_ok() {
                let visible = rx.borrow_and_update().clone();
                toasts.set(visible);
            }
        }
    });

    #[cfg(target_arch = "wasm32")]
    {
        let browser_services = services.clone();
        use_future(move || {
            let services = browser_services.clone();
            let mut theme = app_state.theme;
            let mut ready = app_state.ready;
            async move {
                use backend::session::{SESSION_KEY, THEME_KEY};

                if let Err(e) = services.browser_store.hydrate(&[SESSION_KEY, THEME_KEY]).await {
                    tracing::warn!("Failed to load browser storage: {}", e);
                }
                services.session.reload();
                theme.set(services.session.theme());
                ready.set(true);

                let mut listener = document::eval(
                    r#"
                    window.addEventListener('storage', (e) => {
                        if (e.key === null || e.key === 'unicms:user' || e.key === 'theme') {
                            dioxus.send(e.key);
                        }
                    });
                    "#,
                );
                while listener.recv::<serde_json::Value>().await.is_ok() {
                    if let Err(e) = services.browser_store.hydrate(&[SESSION_KEY, THEME_KEY]).await {
                        tracing::warn!("Failed to reload browser storage: {}", e);
                        continue;
                    }
                    services.session.reload();
                    theme.set(services.session.theme());
                }
            }
        });
    }

    let theme_class = match (app_state.theme)() {
        Theme::Dark => "app dark",
        Theme::Light => "app",
    };

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        document::Title { "UniCMS" }
        div { class: theme_class,
            Router::<Route> {}
            ToastStack {}
        }
    }
}
