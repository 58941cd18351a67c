use std::collections::HashMap;

use dioxus::prelude::*;

use crate::backend::analytics::{self, GradeLabel};
use crate::backend::insights;
use crate::backend::models::{Course, Enrollment};
use crate::backend::Services;
use crate::components::common::{SkeletonCards, SkeletonRows};
use crate::components::AppState;
use crate::Route;

#[component]
pub fn PortalHome() -> Element {
    let services = use_context::<Services>();
    let app_state = use_context::<AppState>();

    let mut all_courses = use_signal(Vec::<Course>::new);
    let mut enrollments = use_signal(Vec::<Enrollment>::new);
    let mut grades = use_signal(HashMap::<i64, GradeLabel>::new);
    let mut loading = use_signal(|| true);

    let api = services.api.clone();
    use_effect(move || {
        let email = app_state.email();
        if email.is_empty() {
            return;
        }
        let api = api.clone();
        spawn(async move {
            let (c, e, r) = futures::join!(api.list_courses(), api.list_enrollments(&email), api.list_results());
            all_courses.set(c.unwrap_or_default());
            enrollments.set(e.unwrap_or_else(|err| {
                tracing::warn!("Failed to load enrollments for {}: {}", email, err);
                Vec::new()
            }));
            grades.set(r.map(|rows| insights::grades_by_enrollment(&rows)).unwrap_or_default());
            loading.set(false);
        });
    });

    let session = app_state.session.read().clone();
    let email = session.as_ref().map(|s| s.email.clone()).unwrap_or_default();
    let greeting = match session.as_ref().and_then(|s| s.name.clone()) {
        Some(name) => format!("Welcome, {}", name),
        None => "Welcome".to_string(),
    };
    let rows = enrollments.read().clone();
    let grade_map = grades.read().clone();
    let course_total = all_courses.read().len();

    rsx! {
        section { class: "stack",
            div { class: "card",
                div { class: "welcome",
                    div {
                        h2 { class: "welcome-title", "{greeting}" }
                        p { class: "muted", "{email}" }
                    }
                    div { class: "actions",
                        Link { to: Route::PortalCourses {}, class: "btn-primary", "Browse Courses" }
                        Link { to: Route::PortalEnrollments {}, class: "btn-ghost", "My Enrollments" }
                    }
                }
            }

            if loading() {
                div { class: "grid grid-3",
                    SkeletonCards { count: 6, height: "h-24" }
                }
            } else {
                div { class: "card",
                    h3 { class: "card-title mb-3", "Enrolled Courses" }
                    if rows.is_empty() {
                        div { class: "muted",
                            "You’re not enrolled yet. "
                            Link { to: Route::PortalCourses {}, class: "link", "Enroll now" }
                            "."
                        }
                    } else {
                        ul { class: "grid grid-3 list",
                            for e in rows.iter() {
                                {
                                    let course = e.course.clone().unwrap_or_else(|| placeholder_course(e.id));
                                    let credit = course.credit.unwrap_or(0);
                                    rsx! {
                                        li { key: "{e.id}", class: "list-row",
                                            div {
                                                div { class: "strong", "{course.title}" }
                                                div { class: "muted text-sm", "{course.code} • {credit} cr" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "card",
                    h3 { class: "card-title mb-3", "Recent Grades" }
                    div { class: "table-wrap",
                        table { class: "table",
                            thead { tr { th { "Course" } th { "Code" } th { "Grade" } } }
                            tbody {
                                if rows.is_empty() {
                                    tr { td { colspan: "3", class: "empty", "No grades yet." } }
                                }
                                for e in rows.iter() {
                                    {
                                        let course = e.course.clone().unwrap_or_else(|| placeholder_course(e.id));
                                        let grade = insights::grade_cell(&grade_map, e.id);
                                        rsx! {
                                            tr { key: "{e.id}",
                                                td { "{course.title}" }
                                                td { "{course.code}" }
                                                td { "{grade}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "card",
                    h3 { class: "card-title mb-3", "All Courses" }
                    p { class: "muted text-sm", "Total {course_total}" }
                }
            }
        }
    }
}

#[component]
pub fn PortalEnrollments() -> Element {
    let services = use_context::<Services>();
    let app_state = use_context::<AppState>();

    let mut enrollments = use_signal(Vec::<Enrollment>::new);
    let mut grades = use_signal(HashMap::<i64, GradeLabel>::new);
    let mut loading = use_signal(|| true);

    let api = services.api.clone();
    use_effect(move || {
        let email = app_state.email();
        if email.is_empty() {
            return;
        }
        let api = api.clone();
        spawn(async move {
            let (e, r) = futures::join!(api.list_enrollments(&email), api.list_results());
            enrollments.set(e.unwrap_or_else(|err| {
                tracing::warn!("Failed to load enrollments for {}: {}", email, err);
                Vec::new()
            }));
            grades.set(r.map(|rows| insights::grades_by_enrollment(&rows)).unwrap_or_default());
            loading.set(false);
        });
    });

    let rows = enrollments.read().clone();
    let grade_map = grades.read().clone();

    rsx! {
        section {
            h2 { class: "section-title", "My Enrollments" }
            div { class: "table-wrap",
                table { class: "table",
                    thead {
                        tr { th { "Course" } th { "Code" } th { "Credits" } th { "Enrolled" } th { "Grade" } }
                    }
                    tbody {
                        if loading() {
                            SkeletonRows { rows: 4, cols: 5 }
                        } else if rows.is_empty() {
                            tr { td { colspan: "5", class: "empty", "No enrollments yet." } }
                        } else {
                            for e in rows {
                                {
                                    let course = e.course.clone().unwrap_or_else(|| placeholder_course(e.id));
                                    let credit = course.credit.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
                                    let enrolled = e
                                        .enrolled_at
                                        .as_deref()
                                        .map(analytics::format_timestamp)
                                        .unwrap_or_else(|| "—".to_string());
                                    let grade = insights::grade_cell(&grade_map, e.id);
                                    rsx! {
                                        tr { key: "{e.id}",
                                            td { "{course.title}" }
                                            td { "{course.code}" }
                                            td { "{credit}" }
                                            td { "{enrolled}" }
                                            td { "{grade}" }
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

/// Stand-in for an enrollment whose course was not embedded.
fn placeholder_course(enrollment_id: i64) -> Course {
    Course {
        id: 0,
        code: String::new(),
        title: format!("Enrollment #{}", enrollment_id),
        credit: None,
        lecturer_name: String::new(),
    }
}
