use dioxus::prelude::*;

use crate::backend::forms::{FieldErrors, StudentDraft};
use crate::backend::insights;
use crate::backend::models::Student;
use crate::backend::Services;
use crate::components::common::{FieldError, Modal, ModalActions, SkeletonRows};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Create,
    Edit(i64),
    Delete(i64),
}

#[component]
pub fn StudentsPage() -> Element {
    let services = use_context::<Services>();

    let mut students = use_signal(Vec::<Student>::new);
    let mut loading = use_signal(|| true);
    let mut query = use_signal(String::new);
    let mut dialog = use_signal(|| None::<Dialog>);
    let mut draft = use_signal(StudentDraft::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut refresh = use_signal(|| 0u64);

    let api = services.api.clone();
    use_effect(move || {
        refresh();
        let api = api.clone();
        spawn(async move {
            match api.list_students().await {
                Ok(rows) => students.set(rows),
                Err(e) => {
                    tracing::warn!("Failed to load students: {}", e);
                    students.set(Vec::new());
                }
            }
            loading.set(false);
        });
    });

    let save_services = services.clone();
    let save = move |_: ()| {
        let Some(current) = dialog() else { return };
        let payload = match draft.read().validate() {
            Ok(payload) => payload,
            Err(field_errors) => {
                errors.set(field_errors);
                save_services.toaster.error("Fill all fields");
                return;
            }
        };
        errors.set(FieldErrors::new());
        let services = save_services.clone();
        spawn(async move {
            let outcome = match current {
                Dialog::Edit(id) => services
                    .api
                    .update_student(id, &payload)
                    .await
                    .map(|_| "Student updated")
                    .map_err(|e| e.user_message("Failed to update student")),
                _ => services
                    .api
                    .create_student(&payload)
                    .await
                    .map(|_| "Student added")
                    .map_err(|e| e.user_message("Failed to add student")),
            };
            match outcome {
                Ok(message) => {
                    services.toaster.success(message);
                    draft.set(StudentDraft::default());
                    dialog.set(None);
                    *refresh.write() += 1;
                }
                Err(message) => {
                    services.toaster.error(message);
                }
            }
        });
    };

    let delete_services = services.clone();
    let confirm_delete = move |_: ()| {
        let Some(Dialog::Delete(id)) = dialog() else { return };
        let services = delete_services.clone();
        spawn(async move {
            match services.api.delete_student(id).await {
                Ok(()) => {
                    services.toaster.success("Student deleted");
                    dialog.set(None);
                    *refresh.write() += 1;
                }
                Err(e) => {
                    services.toaster.error(e.user_message("Failed to delete student"));
                }
            }
        });
    };

    let visible: Vec<Student> = students
        .read()
        .iter()
        .filter(|s| insights::student_matches(s, &query.read()))
        .cloned()
        .collect();

    rsx! {
        section {
            div { class: "page-header",
                h2 { class: "section-title", "Students" }
                div { class: "actions",
                    input {
                        class: "input w-64",
                        placeholder: "Search students…",
                        value: "{query}",
                        oninput: move |e| query.set(e.value()),
                    }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| {
                            draft.set(StudentDraft::default());
                            errors.set(FieldErrors::new());
                            dialog.set(Some(Dialog::Create));
                        },
                        "+ New"
                    }
                }
            }

            div { class: "table-wrap",
                table { class: "table",
                    thead {
                        tr {
                            th { "Name" }
                            th { "Student ID" }
                            th { "Email" }
                            th { class: "w-32", "Actions" }
                        }
                    }
                    tbody {
                        if loading() {
                            SkeletonRows { rows: 4, cols: 4 }
                        } else if visible.is_empty() {
                            tr { td { colspan: "4", class: "empty", "No students found." } }
                        } else {
                            for student in visible {
                                {
                                    let id = student.id;
                                    let edit_draft = StudentDraft::from(&student);
                                    rsx! {
                                        tr { key: "{id}",
                                            td { "{student.name}" }
                                            td { "{student.student_id}" }
                                            td { "{student.email}" }
                                            td {
                                                div { class: "actions",
                                                    button {
                                                        class: "icon-btn",
                                                        title: "Edit",
                                                        onclick: move |_| {
                                                            draft.set(edit_draft.clone());
                                                            errors.set(FieldErrors::new());
                                                            dialog.set(Some(Dialog::Edit(id)));
                                                        },
                                                        "✎"
                                                    }
                                                    button {
                                                        class: "icon-btn danger",
                                                        title: "Delete",
                                                        onclick: move |_| dialog.set(Some(Dialog::Delete(id))),
                                                        "🗑"
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

            match dialog() {
                Some(Dialog::Delete(_)) => rsx! {
                    Modal { title: "Delete Student", on_close: move |_| dialog.set(None),
                        p { "Are you sure you want to delete this student?" }
                        ModalActions {
                            confirm_label: "Delete",
                            confirm_class: "btn-danger",
                            on_cancel: move |_| dialog.set(None),
                            on_confirm: confirm_delete,
                        }
                    }
                },
                Some(current) => {
                    let (title, confirm) = if current == Dialog::Create {
                        ("New Student", "Create")
                    } else {
                        ("Edit Student", "Save")
                    };
                    rsx! {
                        Modal { title: "{title}", on_close: move |_| dialog.set(None),
                            StudentForm { draft, errors }
                            ModalActions {
                                confirm_label: "{confirm}",
                                on_cancel: move |_| dialog.set(None),
                                on_confirm: save,
                            }
                        }
                    }
                }
                None => rsx! {},
            }
        }
    }
}

#[component]
fn StudentForm(draft: Signal<StudentDraft>, errors: Signal<FieldErrors>) -> Element {
    let mut draft = draft;
    let current = draft.read().clone();
    let field_errors = errors.read().clone();

    rsx! {
        div { class: "form-grid",
            div {
                label { class: "field-label", "Name" }
                input {
                    class: "input",
                    value: "{current.name}",
                    oninput: move |e| draft.write().name = e.value(),
                }
                FieldError { message: field_errors.get("name").copied() }
            }
            div {
                label { class: "field-label", "Student ID" }
                input {
                    class: "input",
                    value: "{current.student_id}",
                    oninput: move |e| draft.write().student_id = e.value(),
                }
                FieldError { message: field_errors.get("studentId").copied() }
            }
            div { class: "span-2",
                label { class: "field-label", "Email" }
                input {
                    class: "input",
                    r#type: "email",
                    value: "{current.email}",
                    oninput: move |e| draft.write().email = e.value(),
                }
                FieldError { message: field_errors.get("email").copied() }
            }
        }
    }
}
