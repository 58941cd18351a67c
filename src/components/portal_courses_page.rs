use dioxus::prelude::*;

use crate::backend::insights;
use crate::backend::models::{Course, Enrollment};
use crate::backend::Services;
use crate::components::common::SkeletonCards;
use crate::components::AppState;

/// Course catalogue for the signed-in student, with enroll / unenroll.
#[component]
pub fn PortalCourses() -> Element {
    let services = use_context::<Services>();
    let app_state = use_context::<AppState>();

    let mut courses = use_signal(Vec::<Course>::new);
    let mut enrollments = use_signal(Vec::<Enrollment>::new);
    let mut query = use_signal(String::new);
    let mut loading = use_signal(|| true);
    let mut refresh = use_signal(|| 0u64);

    let api = services.api.clone();
    use_effect(move || {
        refresh();
        let email = app_state.email();
        let api = api.clone();
        spawn(async move {
            let mine = async {
                if email.is_empty() {
                    Ok(Vec::new())
                } else {
                    api.list_enrollments(&email).await
                }
            };
            let (c, e) = futures::join!(api.list_courses(), mine);
            courses.set(c.unwrap_or_else(|err| {
                tracing::warn!("Failed to load courses: {}", err);
                Vec::new()
            }));
            enrollments.set(e.unwrap_or_else(|err| {
                tracing::warn!("Failed to load enrollments: {}", err);
                Vec::new()
            }));
            loading.set(false);
        });
    });

    let enroll_services = services.clone();
    let enroll = move |course_id: i64| {
        let services = enroll_services.clone();
        let email = app_state.email();
        spawn(async move {
            match services.api.enroll(&email, course_id).await {
                Ok(_) => {
                    services.toaster.success("Enrolled");
                    *refresh.write() += 1;
                }
                Err(e) => {
                    services.toaster.error(e.user_message("Failed to enroll"));
                }
            }
        });
    };

    let unenroll_services = services.clone();
    let unenroll = move |course_id: i64| {
        let Some(enrollment_id) = insights::enrollment_for_course(&enrollments.read(), course_id).map(|e| e.id) else {
            return;
        };
        let services = unenroll_services.clone();
        spawn(async move {
            match services.api.unenroll(enrollment_id).await {
                Ok(()) => {
                    services.toaster.success("Unenrolled");
                    *refresh.write() += 1;
                }
                Err(e) => {
                    services.toaster.error(e.user_message("Unenroll not supported"));
                }
            }
        });
    };

    let enrolled = insights::enrolled_course_ids(&enrollments.read());
    let visible: Vec<Course> = courses
        .read()
        .iter()
        .filter(|c| insights::course_matches(c, &query.read()))
        .cloned()
        .collect();

    rsx! {
        section {
            div { class: "page-header",
                h2 { class: "section-title", "Browse Courses" }
                input {
                    class: "input w-64",
                    placeholder: "Search…",
                    value: "{query}",
                    oninput: move |e| query.set(e.value()),
                }
            }

            div { class: "grid grid-3",
                if loading() {
                    SkeletonCards { count: 6 }
                } else {
                    for course in visible {
                        {
                            let id = course.id;
                            let is_enrolled = enrolled.contains(&id);
                            let credit = course.credit.unwrap_or(0);
                            let enroll = enroll.clone();
                            let unenroll = unenroll.clone();
                            rsx! {
                                div { key: "{id}", class: "card",
                                    div { class: "card-header",
                                        div {
                                            h3 { class: "card-title", "{course.title}" }
                                            p { class: "muted text-sm", "{course.code} • {credit} credits" }
                                            p { "Lecturer: {course.lecturer_name}" }
                                        }
                                        if is_enrolled {
                                            span { class: "badge badge-ok", "Enrolled" }
                                        } else {
                                            span { class: "badge badge-info", "Open" }
                                        }
                                    }
                                    div { class: "mt-4",
                                        if is_enrolled {
                                            button { class: "btn-ghost", onclick: move |_| unenroll(id), "Unenroll" }
                                        } else {
                                            button { class: "btn-primary", onclick: move |_| enroll(id), "Enroll" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
