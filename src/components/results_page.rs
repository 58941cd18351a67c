use dioxus::prelude::*;

use crate::backend::analytics::{self, Grade, GradeLabel, ResultFilter, ResultsSummary};
use crate::backend::models::ResultRecord;
use crate::backend::Services;
use crate::components::common::{grade_color, GradeBars, PassFailDonut, SkeletonRows};

const CSV_FILE: &str = "results.csv";

#[component]
pub fn ResultsPage() -> Element {
    let services = use_context::<Services>();

    let mut results = use_signal(Vec::<ResultRecord>::new);
    let mut loading = use_signal(|| true);
    let mut warning = use_signal(|| None::<&'static str>);
    let mut filter = use_signal(ResultFilter::default);

    let api = services.api.clone();
    use_effect(move || {
        let api = api.clone();
        spawn(async move {
            let (rows, notice) = api.results_or_warning().await;
            results.set(rows);
            warning.set(notice);
            loading.set(false);
        });
    });

    let all_rows = results.read();
    let current = filter.read().clone();
    let working_set = current.apply(all_rows.iter());
    let summary = ResultsSummary::from_rows(&working_set);
    let courses = analytics::courses_in(&all_rows);
    let csv = analytics::to_csv(&working_set);
    let table_rows: Vec<ResultRecord> = working_set.iter().map(|r| (*r).clone()).collect();

    let gpa = format!("{:.2}", summary.gpa);
    let pass_rate = format!("{:.0}%", summary.pass_rate());
    let course_value = current.course_id.map(|id| id.to_string()).unwrap_or_else(|| "ALL".to_string());
    let grade_value = current.grade.map(|g| g.to_string()).unwrap_or_else(|| "ALL".to_string());

    let export_services = services.clone();
    let export = move |_| {
        let rows = csv.lines().count().saturating_sub(1);
        match save_csv(&csv) {
            Ok(location) => {
                tracing::info!("Exported {} results to {}", rows, location);
                export_services.toaster.success(format!("Exported {} rows to {}", rows, location));
            }
            Err(e) => {
                export_services.toaster.error(format!("Export failed: {}", e));
            }
        }
    };

    rsx! {
        section {
            div { class: "page-header",
                h2 { class: "section-title", "Results Analytics" }
                div { class: "actions",
                    button { class: "btn-ghost", onclick: export, "Export CSV" }
                    if let Some(message) = warning() {
                        span { class: "badge badge-warn", "{message}" }
                    }
                }
            }

            div { class: "grid grid-4 mb-6",
                div { class: "card",
                    p { class: "muted text-sm", "Average GPA" }
                    p { class: "kpi", "{gpa}" }
                }
                div { class: "card",
                    p { class: "muted text-sm", "Pass Rate" }
                    p { class: "kpi", "{pass_rate}" }
                }
                div { class: "card",
                    p { class: "muted text-sm", "Graded Results" }
                    p { class: "kpi", "{summary.total}" }
                }
                div { class: "card",
                    p { class: "muted text-sm", "Courses Covered" }
                    p { class: "kpi", "{summary.courses_covered}" }
                }
            }

            div { class: "card mb-6",
                div { class: "grid grid-4",
                    div {
                        label { class: "field-label", "Course" }
                        select {
                            class: "input",
                            value: "{course_value}",
                            onchange: move |e| filter.write().course_id = e.value().parse::<i64>().ok(),
                            option { value: "ALL", "All courses" }
                            for c in courses {
                                option { key: "{c.id}", value: "{c.id}", "{c.display_name()}" }
                            }
                        }
                    }
                    div {
                        label { class: "field-label", "Grade" }
                        select {
                            class: "input",
                            value: "{grade_value}",
                            onchange: move |e| filter.write().grade = parse_grade_filter(&e.value()),
                            option { value: "ALL", "All" }
                            for g in Grade::ALL {
                                option { key: "{g}", value: "{g}", "{g}" }
                            }
                            option { value: "N/A", "N/A" }
                        }
                    }
                    div { class: "span-2",
                        label { class: "field-label", "Search by student email" }
                        input {
                            class: "input",
                            placeholder: "e.g. alice@example.com",
                            value: "{current.email_query}",
                            oninput: move |e| filter.write().email_query = e.value(),
                        }
                    }
                }
            }

            div { class: "grid grid-3",
                div { class: "card span-2",
                    h3 { class: "card-title mb-3", "Grade Distribution" }
                    if loading() {
                        div { class: "skeleton h-64" }
                    } else {
                        GradeBars { histogram: summary.histogram, colored: true, height: 360 }
                    }
                }
                div { class: "card",
                    h3 { class: "card-title mb-3", "Pass vs Fail" }
                    if loading() {
                        div { class: "skeleton h-64" }
                    } else {
                        PassFailDonut { pass: summary.pass, fail: summary.fail }
                    }
                }
            }

            div { class: "card mt-6 table-wrap",
                h3 { class: "card-title mb-3", "All Results" }
                table { class: "table",
                    thead {
                        tr {
                            th { "Student Email" }
                            th { "Course" }
                            th { "Credit" }
                            th { "Grade" }
                            th { "Updated" }
                            th { "ID" }
                        }
                    }
                    tbody {
                        if loading() {
                            SkeletonRows { rows: 5, cols: 6 }
                        } else if table_rows.is_empty() {
                            tr { td { colspan: "6", class: "empty", "No results match your filters." } }
                        } else {
                            for r in table_rows {
                                ResultRow { key: "{r.id}", result: r.clone() }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ResultRow(result: ResultRecord) -> Element {
    let label = analytics::label_of(&result);
    let color = grade_color(label);
    let badge_style = format!("background-color: {color}22; color: {color}; border-color: {color}55");
    let email = result.student_email().unwrap_or_default().to_string();
    let course = result.course().map(|c| c.display_name()).unwrap_or_default();
    let credit = result
        .course()
        .and_then(|c| c.credit)
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    let updated = result
        .updated_at
        .as_deref()
        .map(analytics::format_timestamp)
        .unwrap_or_else(|| "—".to_string());

    rsx! {
        tr {
            td { "{email}" }
            td { "{course}" }
            td { "{credit}" }
            td { span { class: "badge", style: "{badge_style}", "{label}" } }
            td { "{updated}" }
            td { class: "muted", "{result.id}" }
        }
    }
}

fn parse_grade_filter(raw: &str) -> Option<GradeLabel> {
    match raw {
        "ALL" => None,
        "N/A" => Some(GradeLabel::Ungraded),
        other => other.parse::<Grade>().ok().map(GradeLabel::Graded),
    }
}

/// Hands the CSV to the browser as a download.
#[cfg(target_arch = "wasm32")]
fn save_csv(csv: &str) -> Result<String, String> {
    let content = serde_json::to_string(csv).map_err(|e| e.to_string())?;
    let script = format!(
        r#"
        const blob = new Blob([{content}], {{ type: 'text/csv;charset=utf-8;' }});
        const url = URL.createObjectURL(blob);
        const a = document.createElement('a');
        a.href = url;
        a.download = '{CSV_FILE}';
        a.click();
        URL.revokeObjectURL(url);
        "#
    );
    let _ = document::eval(&script);
    Ok(CSV_FILE.to_string())
}

/// Writes the CSV next to the running app.
#[cfg(not(target_arch = "wasm32"))]
fn save_csv(csv: &str) -> Result<String, String> {
    let path = std::env::current_dir().map_err(|e| e.to_string())?.join(CSV_FILE);
    std::fs::write(&path, csv).map_err(|e| e.to_string())?;
    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_filter_options() {
        assert_eq!(parse_grade_filter("ALL"), None);
        assert_eq!(parse_grade_filter("N/A"), Some(GradeLabel::Ungraded));
        assert_eq!(parse_grade_filter("C"), Some(GradeLabel::Graded(Grade::C)));
        assert_eq!(parse_grade_filter("bogus"), None);
    }
}
