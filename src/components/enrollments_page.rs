use std::collections::HashMap;

use dioxus::prelude::*;

use crate::backend::analytics::{Grade, GradeLabel};
use crate::backend::insights;
use crate::backend::models::{Enrollment, Student};
use crate::backend::Services;
use crate::components::common::SkeletonRows;

/// Pick a student, see their enrollments, publish a grade per row.
#[component]
pub fn EnrollmentsPage() -> Element {
    let services = use_context::<Services>();

    let mut students = use_signal(Vec::<Student>::new);
    let mut selected_email = use_signal(String::new);
    let mut enrollments = use_signal(Vec::<Enrollment>::new);
    let mut grades = use_signal(HashMap::<i64, GradeLabel>::new);
    let mut loading = use_signal(|| true);

    let roster_api = services.api.clone();
    use_effect(move || {
        let api = roster_api.clone();
        spawn(async move {
            match api.list_students().await {
                Ok(rows) => {
                    if let Some(first) = rows.first() {
                        selected_email.set(first.email.clone());
                    } else {
                        loading.set(false);
                    }
                    students.set(rows);
                }
                Err(e) => {
                    tracing::warn!("Failed to load students: {}", e);
                    students.set(Vec::new());
                    loading.set(false);
                }
            }
        });
    });

    // Re-runs whenever the selection changes.
    let enrollment_api = services.api.clone();
    use_effect(move || {
        let email = selected_email();
        if email.is_empty() {
            return;
        }
        let api = enrollment_api.clone();
        loading.set(true);
        spawn(async move {
            let (rows, results) = futures::join!(api.list_enrollments(&email), api.list_results());
            enrollments.set(rows.unwrap_or_else(|e| {
                tracing::warn!("Failed to load enrollments for {}: {}", email, e);
                Vec::new()
            }));
            grades.set(results.map(|r| insights::grades_by_enrollment(&r)).unwrap_or_default());
            loading.set(false);
        });
    });

    let assign_services = services.clone();
    let assign = move |enrollment_id: i64, raw: String| {
        let Ok(grade) = raw.parse::<Grade>() else { return };
        let services = assign_services.clone();
        spawn(async move {
            match services.api.assign_grade(enrollment_id, grade).await {
                Ok(_) => {
                    grades.write().insert(enrollment_id, GradeLabel::Graded(grade));
                    services.toaster.success(format!("Grade {} saved", grade));
                }
                Err(e) => {
                    services.toaster.error(e.user_message("Failed to save grade"));
                }
            }
        });
    };

    let roster = students.read().clone();
    let rows = enrollments.read().clone();
    let current_grades = grades.read().clone();

    rsx! {
        section {
            h2 { class: "section-title", "Enrollments & Grades" }

            div { class: "field mb-6",
                label { class: "field-label", "Select Student" }
                select {
                    class: "input",
                    value: "{selected_email}",
                    onchange: move |e| selected_email.set(e.value()),
                    for s in roster.iter() {
                        option { key: "{s.id}", value: "{s.email}", "{s.name} ({s.email})" }
                    }
                }
            }

            div { class: "table-wrap",
                table { class: "table",
                    thead {
                        tr {
                            th { "Student Id" }
                            th { "Course" }
                            th { "Assign Grade" }
                        }
                    }
                    tbody {
                        if loading() {
                            SkeletonRows { rows: 4, cols: 3 }
                        } else if rows.is_empty() {
                            tr { td { colspan: "3", class: "empty", "No enrollments for this student." } }
                        } else {
                            for enrollment in rows {
                                {
                                    let id = enrollment.id;
                                    let student_id = roster
                                        .iter()
                                        .find(|s| s.email == enrollment.student_email)
                                        .map(|s| s.student_id.clone())
                                        .unwrap_or_else(|| enrollment.student_email.clone());
                                    let course = enrollment.course.as_ref().map(|c| c.title.clone()).unwrap_or_default();
                                    let current = match current_grades.get(&id) {
                                        Some(GradeLabel::Graded(g)) => g.to_string(),
                                        _ => String::new(),
                                    };
                                    let assign = assign.clone();
                                    rsx! {
                                        tr { key: "{id}",
                                            td { "{student_id}" }
                                            td { "{course}" }
                                            td {
                                                select {
                                                    class: "input",
                                                    value: "{current}",
                                                    onchange: move |e| assign(id, e.value()),
                                                    option { value: "", disabled: true, "Select" }
                                                    for g in Grade::ALL {
                                                        option { key: "{g}", value: "{g}", "{g}" }
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
    }
}
