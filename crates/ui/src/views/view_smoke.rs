use std::num::NonZeroUsize;

use dioxus::prelude::*;
use quiz_core::location::ViewLocation;
use quiz_core::model::{ChoiceKey, PersistedProgress, QuestionRecord};
use quiz_core::session::{QuizAction, QuizSession, SessionOptions};
use quiz_core::subset::SubsetPolicy;
use quiz_core::time::{Clock, fixed_now};
use storage::repository::{KeyValueRepository, Storage};

use super::ResultsView;
use super::results::ResultsViewProps;
use super::test_harness::{drive_dom, setup_quiz_harness, setup_quiz_harness_with_storage};

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_page() {
    let mut harness = setup_quiz_harness("first-page", 5, "quiz://local/?perPage=2").await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Page 1 of 3"), "missing indicator in {html}");
    assert!(html.contains("Question "), "missing question badge in {html}");
    assert!(html.contains("Reveal Answer"), "missing reveal button in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
    assert!(!html.contains("Submit"), "submit shown before last page in {html}");
    assert!(html.contains("page=1"), "location not rewritten in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reveal_and_navigate() {
    let mut harness = setup_quiz_harness("reveal", 2, "quiz://local/").await;
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.handles.dispatch();
    dispatch.call(QuizAction::SelectChoice {
        position: 0,
        key: ChoiceKey::new("B").unwrap(),
    });
    harness.settle().await;
    dispatch.call(QuizAction::Reveal { position: 0 });
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Correct answer: "), "missing reveal in {html}");
    assert!(html.contains("border-danger"), "wrong pick not marked in {html}");
    assert!(html.contains("border-success"), "correct pick not marked in {html}");

    dispatch.call(QuizAction::NextPage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Page 2 of 2"), "did not advance in {html}");
    assert!(html.contains("Submit"), "missing submit on last page in {html}");
    assert_eq!(harness.handles.vm().peek().page().page, 2);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_submit_shows_results() {
    let mut harness = setup_quiz_harness("submit", 1, "quiz://local/").await;
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.handles.dispatch();
    dispatch.call(QuizAction::SelectChoice {
        position: 0,
        key: ChoiceKey::new("A").unwrap(),
    });
    harness.settle().await;
    dispatch.call(QuizAction::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("You scored"), "missing score in {html}");
    assert!(html.contains("Q1"), "missing review row in {html}");
    assert!(html.contains("Show Answer Details"), "missing details toggle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reset_dialog_round_trip() {
    let storage = Storage::in_memory();
    let mut harness = setup_quiz_harness_with_storage(
        "reset",
        Some(super::test_harness::bank_json(3)),
        "quiz://local/?page=2&perPage=1",
        storage,
    )
    .await;
    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("Page 2 of 3"));

    let dispatch = harness.handles.dispatch();
    dispatch.call(QuizAction::RequestReset);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Are you sure?"), "missing dialog in {html}");

    dispatch.call(QuizAction::ConfirmReset);
    harness.settle().await;
    let html = harness.render();
    assert!(!html.contains("Are you sure?"), "dialog still open in {html}");
    assert!(html.contains("Page 1 of 3"), "reset did not return to page 1 in {html}");

    let saved = harness.storage.kv.get_value("quiz-progress-v1").await.unwrap();
    assert!(saved.is_some_and(|raw| raw.contains("\"page\":1")));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_subset_change_reloads() {
    let mut harness = setup_quiz_harness("subset", 12, "quiz://local/?perPage=5").await;
    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("Page 1 of 3"));

    harness
        .handles
        .dispatch()
        .call(QuizAction::SetSubsetPolicy(SubsetPolicy::Count(
            NonZeroUsize::new(10).unwrap(),
        )));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Page 1 of 2"), "subset not applied in {html}");
    let stored = harness
        .storage
        .kv
        .get_value("quiz-total-questions")
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("10"));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_bank_error() {
    let mut harness =
        setup_quiz_harness_with_storage("missing", None, "quiz://local/", Storage::in_memory())
            .await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Could not load the questions."),
        "missing error in {html}"
    );
}

#[test]
fn results_view_smoke_renders_score_and_rows() {
    let bank = (1..=2)
        .map(|id| {
            QuestionRecord {
                enumeration: Some(id),
                question: Some(format!("Prompt {id}")),
                options: [("A", "yes"), ("B", "no")]
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                correct: vec!["A".to_string()],
            }
            .validate()
            .unwrap()
        })
        .collect();
    let mut session = QuizSession::initialize(
        bank,
        PersistedProgress::default(),
        SubsetPolicy::All,
        &ViewLocation::parse("quiz://local/?perPage=2").unwrap(),
        SessionOptions {
            clock: Clock::fixed(fixed_now()),
            ..SessionOptions::default()
        },
        &mut rand::rng(),
    );
    session.apply(QuizAction::SelectChoice {
        position: 0,
        key: ChoiceKey::new("A").unwrap(),
    });
    session.apply(QuizAction::Submit);
    let report = session.report().cloned().unwrap();

    let mut dom = VirtualDom::new_with_props(ResultsView, ResultsViewProps { report });
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("You scored"), "missing score in {html}");
    assert!(html.contains("Submitted 2023-11-14 22:13 UTC"), "missing timestamp in {html}");
    assert!(html.contains("Your answer: "), "missing answer line in {html}");
    assert!(html.contains("None"), "unanswered row not shown in {html}");
}
