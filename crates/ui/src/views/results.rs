use dioxus::prelude::*;

use quiz_core::session::{ChoiceMark, ResultReport, ResultRow};

use crate::views::quiz::join_keys;
use crate::vm::format_datetime;

#[component]
pub fn ResultsView(report: ResultReport) -> Element {
    let submitted_at = format_datetime(report.submitted_at);

    rsx! {
        div { class: "results",
            div { class: "alert alert-info text-center",
                "You scored "
                b { "{report.score.correct}" }
                " out of "
                b { "{report.score.total}" }
            }
            p { class: "submitted-at", "Submitted {submitted_at}" }
            div { class: "progress",
                div { class: "progress-bar", style: "width: 100%", "100%" }
            }
            for (index, row) in report.rows.iter().enumerate() {
                ResultCard { key: "{index}", index, row: row.clone() }
            }
        }
    }
}

#[component]
fn ResultCard(index: usize, row: ResultRow) -> Element {
    let mut expanded = use_signal(|| false);
    let answer = row
        .answer
        .as_ref()
        .map_or_else(|| "None".to_string(), ToString::to_string);
    let verdict = if row.is_correct { "✅" } else { "❌" };
    let border = if row.is_correct {
        "card mb-3 border-success"
    } else {
        "card mb-3 border-danger"
    };
    let correct = join_keys(&row.correct_keys);
    let details_id = format!("ans-{index}");
    let is_open = expanded();

    rsx! {
        div { class: "{border}",
            div { class: "card-body",
                div { class: "mb-2",
                    span { class: "badge bg-secondary", "Q{row.enumeration}" }
                    " {row.text}"
                }
                div {
                    "Your answer: "
                    b { "{answer}" }
                    " {verdict}"
                }
                div {
                    "Correct answer: "
                    b { "{correct}" }
                }
                button {
                    class: "btn btn-link p-0 mt-2",
                    r#type: "button",
                    "aria-controls": "{details_id}",
                    "aria-expanded": "{is_open}",
                    onclick: move |_| expanded.set(!is_open),
                    if is_open { "Hide Answer Details" } else { "Show Answer Details" }
                }
                if is_open {
                    div { id: "{details_id}", class: "mt-2",
                        for line in row.options.iter() {
                            div { class: mark_class(line.mark),
                                b { "{line.key}." }
                                " {line.text}"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn mark_class(mark: Option<ChoiceMark>) -> &'static str {
    match mark {
        Some(ChoiceMark::Correct) => "mb-1 text-success fw-bold",
        Some(ChoiceMark::Incorrect) => "mb-1 text-danger",
        None => "mb-1",
    }
}
