use dioxus::prelude::*;

use crate::backend::guard::{self, Area, Decision};
use crate::backend::Services;
use crate::components::common::Redirect;
use crate::components::AppState;
use crate::Route;

struct NavItem {
    to: Route,
    label: &'static str,
    icon: &'static str,
}

fn nav_items(area: Area) -> Vec<NavItem> {
    match area {
        Area::Admin => vec![
            NavItem { to: Route::AdminDashboard {}, label: "Dashboard", icon: "📊" },
            NavItem { to: Route::CoursesPage {}, label: "Courses", icon: "📘" },
            NavItem { to: Route::StudentsPage {}, label: "Students", icon: "👥" },
            NavItem { to: Route::EnrollmentsPage {}, label: "Enrollments", icon: "📋" },
            NavItem { to: Route::ResultsPage {}, label: "Results", icon: "🎓" },
        ],
        Area::Student => vec![
            NavItem { to: Route::PortalHome {}, label: "Home", icon: "📊" },
            NavItem { to: Route::PortalCourses {}, label: "Courses", icon: "📘" },
            NavItem { to: Route::PortalEnrollments {}, label: "My Enrollments", icon: "📋" },
        ],
    }
}

#[component]
pub fn AdminShell() -> Element {
    rsx! { Shell { area: Area::Admin } }
}

#[component]
pub fn PortalShell() -> Element {
    rsx! { Shell { area: Area::Student } }
}

/// Resolves `/` to the login page or the signed-in role's home.
#[component]
pub fn Landing() -> Element {
    let app_state = use_context::<AppState>();
    if !(app_state.ready)() {
        return rsx! { BootScreen {} };
    }
    let target = guard::landing(app_state.session.read().as_ref());
    rsx! { Redirect { to: Route::from(target) } }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    tracing::debug!("No route for /{}", segments.join("/"));
    rsx! { Redirect { to: Route::Landing {} } }
}

#[component]
fn BootScreen() -> Element {
    rsx! {
        div { class: "boot-screen",
            div { class: "skeleton boot-logo" }
        }
    }
}

/// Layout of both role-gated areas: sidebar, header, routed page, footer.
/// Redirects instead of rendering when the session does not fit the area.
#[component]
fn Shell(area: Area) -> Element {
    let mut app_state = use_context::<AppState>();
    let services = use_context::<Services>();
    let mut sidebar_open = use_signal(|| false);

    if !(app_state.ready)() {
        return rsx! { BootScreen {} };
    }

    let decision = guard::decide(app_state.session.read().as_ref(), area);
    if let Decision::Redirect(target) = decision {
        return rsx! { Redirect { to: Route::from(target) } };
    }

    let dark = (app_state.theme)() == crate::backend::session::Theme::Dark;
    let mode_label = format!("{} mode", area.required_role().label());
    let sidebar_class = if sidebar_open() { "sidebar sidebar-open" } else { "sidebar" };
    let year = chrono::Local::now().format("%Y").to_string();

    let theme_services = services.clone();
    let toggle_theme = move |_| {
        let next = (app_state.theme)().toggled();
        if let Err(e) = theme_services.session.set_theme(next) {
            tracing::warn!("Failed to save theme: {}", e);
        }
        app_state.theme.set(next);
    };

    let sign_out_services = services.clone();
    let sign_out = move |_| {
        if let Err(e) = sign_out_services.session.set(None) {
            sign_out_services.toaster.error(format!("Failed to sign out: {}", e));
            return;
        }
        navigator().replace(Route::LoginPage {});
    };

    rsx! {
        div { class: "shell",
            if sidebar_open() {
                div { class: "sidebar-scrim", onclick: move |_| sidebar_open.set(false) }
            }

            aside { class: sidebar_class,
                div { class: "brand-gradient",
                    div { class: "brand",
                        div { class: "logo-icon", "U" }
                        div {
                            h1 { class: "brand-title", "UniCMS" }
                            p { class: "brand-subtitle", "{area.title()}" }
                        }
                    }
                    nav { class: "nav-links",
                        for item in nav_items(area) {
                            Link {
                                key: "{item.label}",
                                to: item.to,
                                class: "navlink",
                                active_class: "navlink-active",
                                onclick: move |_| sidebar_open.set(false),
                                span { class: "nav-icon", "{item.icon}" }
                                span { class: "nav-label", "{item.label}" }
                            }
                        }
                    }
                }
            }

            div { class: "shell-main",
                header { class: "shell-header",
                    div { class: "header-left",
                        button { class: "btn-ghost menu-btn", onclick: move |_| sidebar_open.set(true), "☰" }
                        div { class: "mode-label", "{mode_label}" }
                    }
                    div { class: "header-right",
                        button {
                            class: "icon-btn",
                            aria_label: "Toggle theme",
                            onclick: toggle_theme,
                            if dark { "☀" } else { "☾" }
                        }
                        button { class: "icon-btn", title: "Sign out", onclick: sign_out, "⎋" }
                    }
                }

                main { class: "shell-content",
                    Outlet::<Route> {}
                }

                footer { class: "shell-footer", "© {year} UniCMS" }
            }
        }
    }
}
