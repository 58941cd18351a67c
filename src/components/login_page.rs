use dioxus::prelude::*;

use crate::backend::models::{Role, Session, Student};
use crate::backend::Services;
use crate::Route;

/// Demo sign-in: pick a role, and for students an email from the roster.
#[component]
pub fn LoginPage() -> Element {
    let services = use_context::<Services>();

    let mut role = use_signal(|| Role::Student);
    let mut students = use_signal(Vec::<Student>::new);
    let mut email = use_signal(String::new);

    let api = services.api.clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            match api.list_students().await {
                Ok(rows) => {
                    if email.read().is_empty() {
                        if let Some(first) = rows.first() {
                            email.set(first.email.clone());
                        }
                    }
                    students.set(rows);
                }
                Err(e) => {
                    tracing::warn!("Failed to load students for sign-in: {}", e);
                    students.set(Vec::new());
                }
            }
        });
    });

    let submit = move |_| {
        let session = match role() {
            Role::Admin => Session::admin(),
            Role::Student => {
                let chosen = email.read().clone();
                if chosen.is_empty() {
                    return;
                }
                let name = students
                    .read()
                    .iter()
                    .find(|s| s.email == chosen)
                    .map(|s| s.name.clone());
                Session::student(chosen, name)
            }
        };
        let home = match session.role {
            Role::Admin => Route::AdminDashboard {},
            Role::Student => Route::PortalHome {},
        };
        if let Err(e) = services.session.set(Some(session)) {
            services.toaster.error(format!("Failed to sign in: {}", e));
            return;
        }
        navigator().push(home);
    };

    let student_class = if role() == Role::Student { "btn w-full btn-role-student" } else { "btn w-full btn-ghost" };
    let admin_class = if role() == Role::Admin { "btn w-full btn-role-admin" } else { "btn w-full btn-ghost" };

    rsx! {
        div { class: "login",
            section { class: "login-hero",
                div { class: "brand",
                    div { class: "logo-icon logo-lg", "U" }
                    div {
                        h1 { class: "login-title", "UniCMS" }
                        p { class: "login-subtitle", "University Course Management" }
                    }
                }
                h2 { class: "login-welcome", "Welcome back!" }
            }

            section { class: "login-form-bg",
                div { class: "card login-card",
                    h3 { class: "card-title", "Sign in" }
                    p { class: "muted", "Continue as a Student or Admin." }

                    div { class: "role-switch",
                        button { class: student_class, onclick: move |_| role.set(Role::Student), "Student" }
                        button { class: admin_class, onclick: move |_| role.set(Role::Admin), "Admin" }
                    }

                    if role() == Role::Student {
                        div { class: "field",
                            label { class: "field-label", "Choose your email" }
                            select {
                                class: "input",
                                value: "{email}",
                                onchange: move |e| email.set(e.value()),
                                for s in students.read().iter() {
                                    option { key: "{s.id}", value: "{s.email}", "{s.name} ({s.email})" }
                                }
                            }
                        }
                    } else {
                        p { class: "muted field",
                            "Admin console for creating courses, managing students, and publishing grades."
                        }
                    }

                    button { class: "btn-primary w-full", onclick: submit, "Continue" }

                    p { class: "fine-print",
                        "* Demo login. Production would integrate with university SSO."
                    }
                }
            }
        }
    }
}
