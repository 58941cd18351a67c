use dioxus::prelude::*;

use crate::backend::analytics::{self, ResultFilter};
use crate::backend::insights;
use crate::backend::models::{Course, ResultRecord, Student};
use crate::backend::Services;
use crate::components::common::{GradeBars, SkeletonCards, Stat};
use crate::Route;

#[component]
pub fn AdminDashboard() -> Element {
    let services = use_context::<Services>();

    let mut courses = use_signal(Vec::<Course>::new);
    let mut students = use_signal(Vec::<Student>::new);
    let mut results = use_signal(Vec::<ResultRecord>::new);
    let mut results_ok = use_signal(|| true);
    let mut loading = use_signal(|| true);

    // Fetch everything on mount; each list degrades to empty on its own.
    let api = services.api.clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            let (c, s, (rows, notice)) =
                futures::join!(api.list_courses(), api.list_students(), api.results_or_warning());
            courses.set(c.unwrap_or_else(|e| {
                tracing::warn!("Failed to load courses: {}", e);
                Vec::new()
            }));
            students.set(s.unwrap_or_else(|e| {
                tracing::warn!("Failed to load students: {}", e);
                Vec::new()
            }));
            results_ok.set(notice.is_none());
            results.set(rows);
            loading.set(false);
        });
    });

    let course_rows = courses.read();
    let student_rows = students.read();
    let lecturers = insights::distinct_lecturers(&course_rows);
    let avg_credit = insights::average_credit(&course_rows);
    let histogram = analytics::summarize(&results.read(), &ResultFilter::default()).histogram;
    let recent_courses = insights::recent_courses(&course_rows);
    let recent_students = insights::recent_students(&student_rows);

    rsx! {
        section { class: "stack",
            div { class: "card welcome-card",
                div { class: "welcome",
                    div {
                        h2 { class: "welcome-title", "Welcome to UniCMS" }
                        p { class: "muted", "Manage courses, students, enrollments, and results from one place." }
                    }
                    div { class: "actions",
                        Link { to: Route::CoursesPage {}, class: "btn-secondary", "+ New Course" }
                        Link { to: Route::StudentsPage {}, class: "btn-accent", "+ New Student" }
                    }
                }
            }

            div { class: "grid grid-4",
                if loading() {
                    SkeletonCards { count: 4, height: "h-24" }
                } else {
                    Stat { label: "Total Courses", value: "{course_rows.len()}", tone: "primary" }
                    Stat { label: "Total Students", value: "{student_rows.len()}", tone: "secondary" }
                    Stat { label: "Lecturers", value: "{lecturers}", tone: "accent" }
                    Stat { label: "Avg. Credits", value: "{avg_credit}", tone: "primary" }
                }
            }

            div { class: "grid grid-3",
                div { class: "card",
                    div { class: "card-header",
                        h3 { class: "card-title", "Grade Distribution" }
                        if !results_ok() {
                            span { class: "badge badge-warn", "/results not available" }
                        }
                    }
                    if loading() {
                        div { class: "skeleton h-64" }
                    } else {
                        GradeBars { histogram }
                    }
                }

                div { class: "card span-2",
                    div { class: "grid grid-2",
                        div {
                            div { class: "card-header",
                                h3 { class: "card-title", "Recent Courses" }
                                Link { to: Route::CoursesPage {}, class: "link", "View all" }
                            }
                            if recent_courses.is_empty() {
                                div { class: "muted", "No courses yet." }
                            } else {
                                ul { class: "list",
                                    for c in recent_courses {
                                        li { key: "{c.id}", class: "list-row",
                                            div {
                                                div { class: "strong", "{c.title}" }
                                                div { class: "muted text-sm", "{c.code} • {c.lecturer_name}" }
                                            }
                                            span { class: "badge badge-info", "{c.credit.unwrap_or(0)} cr" }
                                        }
                                    }
                                }
                            }
                        }
                        div {
                            div { class: "card-header",
                                h3 { class: "card-title", "New Students" }
                                Link { to: Route::StudentsPage {}, class: "link", "View all" }
                            }
                            div { class: "table-wrap",
                                table { class: "table",
                                    thead { tr { th { "Name" } th { "ID" } th { "Email" } } }
                                    tbody {
                                        if recent_students.is_empty() {
                                            tr { td { colspan: "3", class: "empty", "No students yet." } }
                                        }
                                        for s in recent_students {
                                            tr { key: "{s.id}",
                                                td { "{s.name}" }
                                                td { "{s.student_id}" }
                                                td { "{s.email}" }
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
}
