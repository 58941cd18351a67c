use dioxus::prelude::*;

use crate::backend::analytics::{Grade, GradeHistogram, GradeLabel};
use crate::backend::notify::ToastKind;
use crate::backend::Services;
use crate::Route;

/// Replaces the current location as soon as it mounts.
#[component]
pub fn Redirect(to: Route) -> Element {
    let nav = navigator();
    use_effect(move || {
        nav.replace(to.clone());
    });
    rsx! {}
}

#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div { class: "modal-backdrop", onclick: move |_| on_close.call(()) }
        div { class: "modal", role: "dialog", aria_modal: "true", aria_label: "{title}",
            div { class: "modal-card",
                div { class: "modal-header",
                    h3 { class: "modal-title", "{title}" }
                    button {
                        class: "icon-btn",
                        aria_label: "Close",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }
                {children}
            }
        }
    }
}

/// Cancel / confirm row at the bottom of a modal.
#[component]
pub fn ModalActions(
    confirm_label: String,
    #[props(default = "btn-primary".to_string())] confirm_class: String,
    on_cancel: EventHandler<()>,
    on_confirm: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-actions",
            button { class: "btn-ghost", onclick: move |_| on_cancel.call(()), "Cancel" }
            button { class: "{confirm_class}", onclick: move |_| on_confirm.call(()), "{confirm_label}" }
        }
    }
}

#[component]
pub fn Stat(
    label: String,
    value: String,
    hint: Option<String>,
    #[props(default = "primary".to_string())] tone: String,
) -> Element {
    rsx! {
        div { class: "card stat stat-{tone}",
            div { class: "stat-label", "{label}" }
            div { class: "stat-value", "{value}" }
            if let Some(hint) = hint {
                div { class: "muted text-xs", "{hint}" }
            }
        }
    }
}

#[component]
pub fn FieldError(message: Option<&'static str>) -> Element {
    match message {
        Some(m) => rsx! { p { class: "field-error", "{m}" } },
        None => rsx! {},
    }
}

/// Placeholder rows while a table loads.
#[component]
pub fn SkeletonRows(rows: usize, cols: usize) -> Element {
    rsx! {
        for i in 0..rows {
            tr { key: "{i}",
                td { colspan: "{cols}", div { class: "skeleton h-10" } }
            }
        }
    }
}

#[component]
pub fn SkeletonCards(count: usize, #[props(default = "h-36".to_string())] height: String) -> Element {
    rsx! {
        for i in 0..count {
            div { key: "{i}", class: "card skeleton {height}" }
        }
    }
}

pub fn grade_color(label: GradeLabel) -> &'static str {
    match label {
        GradeLabel::Graded(Grade::A) => "#16a34a",
        GradeLabel::Graded(Grade::B) => "#22c55e",
        GradeLabel::Graded(Grade::C) => "#3b82f6",
        GradeLabel::Graded(Grade::D) => "#f59e0b",
        GradeLabel::Graded(Grade::E) => "#ef4444",
        GradeLabel::Graded(Grade::F) => "#dc2626",
        GradeLabel::Ungraded => "#94a3b8",
    }
}

/// Grade distribution as a bar chart, A..F then N/A.
#[component]
pub fn GradeBars(
    histogram: GradeHistogram,
    #[props(default = false)] colored: bool,
    #[props(default = 260)] height: u32,
) -> Element {
    let max = histogram.max().max(1);
    rsx! {
        div { class: "bar-chart", style: "height: {height}px",
            for (label, count) in histogram.iter() {
                {
                    let pct = count as f64 / max as f64 * 100.0;
                    let color = if colored { grade_color(label) } else { "#4f46e5" };
                    let bar_style = format!("height: {:.1}%; background: {}", pct, color);
                    rsx! {
                        div { key: "{label}", class: "bar-column", title: "{label}: {count}",
                            span { class: "bar-count", "{count}" }
                            div { class: "bar-track",
                                div { class: "bar", style: "{bar_style}" }
                            }
                            span { class: "bar-label", "{label}" }
                        }
                    }
                }
            }
        }
    }
}

/// Pass vs fail donut with legend.
#[component]
pub fn PassFailDonut(pass: usize, fail: usize) -> Element {
    let total = pass + fail;
    let pass_deg = if total == 0 { 0.0 } else { pass as f64 / total as f64 * 360.0 };
    let background = if total == 0 {
        "conic-gradient(#e2e8f0 0deg 360deg)".to_string()
    } else {
        format!("conic-gradient(#10b981 0deg {0:.1}deg, #f43f5e {0:.1}deg 360deg)", pass_deg)
    };
    rsx! {
        div { class: "donut-wrap",
            div { class: "donut", style: "background: {background}",
                div { class: "donut-hole", "{total}" }
            }
            ul { class: "legend",
                li { span { class: "swatch", style: "background: #10b981" } "Pass {pass}" }
                li { span { class: "swatch", style: "background: #f43f5e" } "Fail {fail}" }
            }
        }
    }
}

/// Visible notifications, newest last. Clicking one dismisses it early.
#[component]
pub fn ToastStack() -> Element {
    let app_state = use_context::<crate::components::AppState>();
    let services = use_context::<Services>();
    let toasts = app_state.toasts.read().clone();

    rsx! {
        div { class: "toast-wrap",
            for toast in toasts {
                {
                    let toaster = services.toaster.clone();
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Error => "toast toast-error",
                    };
                    rsx! {
                        div {
                            key: "{id}",
                            class: class,
                            onclick: move |_| toaster.dismiss(id),
                            "{toast.message}"
                        }
                    }
                }
            }
        }
    }
}
