use dioxus::prelude::*;

use crate::backend::forms::{CourseDraft, FieldErrors};
use crate::backend::insights;
use crate::backend::models::Course;
use crate::backend::Services;
use crate::components::common::{FieldError, Modal, ModalActions, SkeletonCards};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Create,
    Edit(i64),
    Delete(i64),
}

#[component]
pub fn CoursesPage() -> Element {
    let services = use_context::<Services>();

    let mut courses = use_signal(Vec::<Course>::new);
    let mut loading = use_signal(|| true);
    let mut query = use_signal(String::new);
    let mut dialog = use_signal(|| None::<Dialog>);
    let mut draft = use_signal(CourseDraft::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut refresh = use_signal(|| 0u64);

    let api = services.api.clone();
    use_effect(move || {
        refresh();
        let api = api.clone();
        spawn(async move {
            match api.list_courses().await {
                Ok(rows) => courses.set(rows),
                Err(e) => {
                    tracing::warn!("Failed to load courses: {}", e);
                    courses.set(Vec::new());
                }
            }
            loading.set(false);
        });
    });

    let mut open_create = move || {
        draft.set(CourseDraft::default());
        errors.set(FieldErrors::new());
        dialog.set(Some(Dialog::Create));
    };
    let mut open_edit = move |course: &Course| {
        draft.set(CourseDraft::from(course));
        errors.set(FieldErrors::new());
        dialog.set(Some(Dialog::Edit(course.id)));
    };

    let save_services = services.clone();
    let save = move |_: ()| {
        let Some(current) = dialog() else { return };
        let payload = match draft.read().validate() {
            Ok(payload) => payload,
            Err(field_errors) => {
                errors.set(field_errors);
                save_services.toaster.error("Please fix form errors");
                return;
            }
        };
        errors.set(FieldErrors::new());
        let services = save_services.clone();
        spawn(async move {
            let outcome = match current {
                Dialog::Edit(id) => services
                    .api
                    .update_course(id, &payload)
                    .await
                    .map(|_| "Course updated")
                    .map_err(|e| e.user_message("Failed to update course")),
                _ => services
                    .api
                    .create_course(&payload)
                    .await
                    .map(|_| "Course created")
                    .map_err(|e| e.user_message("Failed to create course")),
            };
            match outcome {
                Ok(message) => {
                    services.toaster.success(message);
                    draft.set(CourseDraft::default());
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
            match services.api.delete_course(id).await {
                Ok(()) => {
                    services.toaster.success("Course deleted");
                    dialog.set(None);
                    *refresh.write() += 1;
                }
                Err(e) => {
                    services.toaster.error(e.user_message("Failed to delete course"));
                }
            }
        });
    };

    let visible: Vec<Course> = courses
        .read()
        .iter()
        .filter(|c| insights::course_matches(c, &query.read()))
        .cloned()
        .collect();

    rsx! {
        section {
            div { class: "page-header",
                h2 { class: "section-title", "Courses" }
                div { class: "actions",
                    input {
                        class: "input w-56",
                        placeholder: "Search courses…",
                        value: "{query}",
                        oninput: move |e| query.set(e.value()),
                    }
                    button { class: "btn-secondary", onclick: move |_| open_create(), "+ New" }
                }
            }

            if loading() {
                div { class: "grid grid-3",
                    SkeletonCards { count: 6 }
                }
            } else if visible.is_empty() {
                p { class: "muted", "No matching courses." }
            } else {
                div { class: "grid grid-3",
                    for course in visible {
                        {
                            let credit = course.credit.unwrap_or(0);
                            let id = course.id;
                            let edit_target = course.clone();
                            rsx! {
                                div { key: "{id}", class: "card",
                                    div { class: "card-header",
                                        div {
                                            h3 { class: "card-title", "{course.title}" }
                                            p { class: "muted text-sm", "{course.code} • {credit} credits" }
                                        }
                                        div { class: "actions",
                                            button {
                                                class: "icon-btn",
                                                title: "Edit",
                                                onclick: move |_| open_edit(&edit_target),
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
                                    p { "Lecturer: {course.lecturer_name}" }
                                    div { class: "badges",
                                        span { class: "badge badge-info", "Course" }
                                        span { class: "badge badge-ok", "{credit} credits" }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            match dialog() {
                Some(Dialog::Delete(_)) => rsx! {
                    Modal { title: "Delete Course", on_close: move |_| dialog.set(None),
                        p { "Are you sure you want to delete this course? This action cannot be undone." }
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
                        ("New Course", "Create")
                    } else {
                        ("Edit Course", "Save")
                    };
                    rsx! {
                        Modal { title: "{title}", on_close: move |_| dialog.set(None),
                            CourseForm { draft, errors }
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
fn CourseForm(draft: Signal<CourseDraft>, errors: Signal<FieldErrors>) -> Element {
    let mut draft = draft;
    let current = draft.read().clone();
    let field_errors = errors.read().clone();

    rsx! {
        div { class: "form-grid",
            div {
                label { class: "field-label", "Code" }
                input {
                    class: "input",
                    value: "{current.code}",
                    oninput: move |e| draft.write().code = e.value(),
                }
                FieldError { message: field_errors.get("code").copied() }
            }
            div {
                label { class: "field-label", "Title" }
                input {
                    class: "input",
                    value: "{current.title}",
                    oninput: move |e| draft.write().title = e.value(),
                }
                FieldError { message: field_errors.get("title").copied() }
            }
            div {
                label { class: "field-label", "Credit" }
                input {
                    class: "input",
                    r#type: "number",
                    min: "1",
                    value: "{current.credit}",
                    oninput: move |e| draft.write().credit = e.value(),
                }
                FieldError { message: field_errors.get("credit").copied() }
            }
            div {
                label { class: "field-label", "Lecturer" }
                input {
                    class: "input",
                    value: "{current.lecturer_name}",
                    oninput: move |e| draft.write().lecturer_name = e.value(),
                }
                FieldError { message: field_errors.get("lecturerName").copied() }
            }
        }
    }
}
