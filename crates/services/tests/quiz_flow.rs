use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::location::ViewLocation;
use quiz_core::model::ChoiceKey;
use quiz_core::session::{Effect, Phase, QuizAction};
use quiz_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{BankSource, Clock, QuizConfig, QuizService, SessionError};
use storage::repository::{KeyValueRepository, Storage, StorageError};

fn bank_json(n: u64) -> String {
    let records: Vec<String> = (1..=n)
        .map(|id| {
            format!(
                r#"{{"enumeration": {id}, "question": "Question {id}?", "options": {{"A": "first", "B": "second", "C": "third"}}, "correct": ["B"]}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

async fn write_bank(name: &str, n: u64) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quiz-flow-{name}-{}.json", std::process::id()));
    tokio::fs::write(&path, bank_json(n)).await.unwrap();
    path
}

fn service(storage: &Storage, path: &PathBuf, seed: u64) -> QuizService {
    QuizService::with_rng(
        storage,
        QuizConfig::new(BankSource::File(path.clone())),
        Clock::fixed(fixed_now()),
        StdRng::seed_from_u64(seed),
    )
}

fn key(k: &str) -> ChoiceKey {
    ChoiceKey::new(k).unwrap()
}

#[tokio::test]
async fn five_questions_two_per_page_flow() {
    let path = write_bank("five", 5).await;
    let storage = Storage::in_memory();
    let svc = service(&storage, &path, 7);

    let location = ViewLocation::parse("quiz://local/?perPage=2").unwrap();
    let mut session = svc.start(&location).await.unwrap();

    let view = session.page_view();
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.indicator, "Page 1 of 3");
    assert_eq!(view.questions.len(), 2);

    let effect = svc.dispatch(&mut session, QuizAction::Submit).await.unwrap();
    assert_eq!(effect, Effect::Ignored);

    for position in 0..5 {
        svc.dispatch(
            &mut session,
            QuizAction::SelectChoice {
                position,
                key: key(if position % 2 == 0 { "B" } else { "A" }),
            },
        )
        .await
        .unwrap();
    }

    svc.dispatch(&mut session, QuizAction::NextPage).await.unwrap();
    svc.dispatch(&mut session, QuizAction::NextPage).await.unwrap();
    let view = session.page_view();
    assert_eq!(view.page, 3);
    assert_eq!(view.questions.len(), 1);
    assert_eq!(view.progress_percent, 100);
    assert_eq!(session.location().page(), NonZeroUsize::new(3));

    let effect = svc.dispatch(&mut session, QuizAction::Submit).await.unwrap();
    assert_eq!(effect, Effect::Persist);
    assert_eq!(session.phase(), Phase::Submitted);
    let report = session.report().unwrap();
    assert_eq!(report.score.correct, 3);
    assert_eq!(report.score.total, 5);
    assert_eq!(report.submitted_at, fixed_now());

    let effect = svc
        .dispatch(&mut session, QuizAction::PrevPage)
        .await
        .unwrap();
    assert_eq!(effect, Effect::Ignored);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn reload_resumes_where_the_user_left() {
    let path = write_bank("reload", 6).await;
    let storage = Storage::in_memory();

    let first_svc = service(&storage, &path, 1);
    let mut first = first_svc
        .start(&ViewLocation::parse("quiz://local/?perPage=3").unwrap())
        .await
        .unwrap();
    first_svc
        .dispatch(&mut first, QuizAction::SelectChoice { position: 1, key: key("C") })
        .await
        .unwrap();
    first_svc
        .dispatch(&mut first, QuizAction::Reveal { position: 1 })
        .await
        .unwrap();
    first_svc.dispatch(&mut first, QuizAction::NextPage).await.unwrap();

    let reload_svc = service(&storage, &path, 2);
    let second = reload_svc
        .start(&ViewLocation::parse("quiz://local/").unwrap())
        .await
        .unwrap();

    assert_eq!(
        second.state().ordered_enumerations(),
        first.state().ordered_enumerations()
    );
    assert_eq!(second.state().answer(1), Some(&key("C")));
    assert!(second.state().is_revealed(1));
    assert_eq!(second.state().page().get(), 2);
    assert_eq!(second.state().page_size().get(), 3);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn location_overrides_saved_pagination_and_is_clamped() {
    let path = write_bank("clamp", 4).await;
    let storage = Storage::in_memory();
    let svc = service(&storage, &path, 3);

    svc.start(&ViewLocation::parse("quiz://local/?page=2&perPage=2").unwrap())
        .await
        .unwrap();

    let session = svc
        .start(&ViewLocation::parse("quiz://local/?page=9&perPage=1&lang=en").unwrap())
        .await
        .unwrap();
    assert_eq!(session.state().page().get(), 4);
    assert_eq!(session.state().page_size().get(), 1);
    assert_eq!(
        session.location().url().as_str(),
        "quiz://local/?page=4&perPage=1&lang=en"
    );

    tokio::fs::remove_file(&path).await.unwrap();
}

struct BrokenRepository;

#[async_trait]
impl KeyValueRepository for BrokenRepository {
    async fn get_value(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn put_value(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn remove_value(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn unreadable_storage_degrades_but_failed_save_is_reported() {
    let path = write_bank("broken", 3).await;
    let storage = Storage {
        kv: Arc::new(BrokenRepository),
    };
    let svc = service(&storage, &path, 4);

    let err = svc
        .start(&ViewLocation::parse("quiz://local/").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));

    let progress = svc.store().load().await;
    assert!(progress.order.is_empty());

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn missing_bank_is_a_bank_error() {
    let storage = Storage::in_memory();
    let svc = service(&storage, &PathBuf::from("/nonexistent/quiz-bank.json"), 5);
    let err = svc
        .start(&ViewLocation::parse("quiz://local/").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Bank(_)));
}
