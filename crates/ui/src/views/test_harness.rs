use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::location::ViewLocation;
use quiz_core::time::fixed_now;
use services::{BankSource, Clock, QuizConfig, QuizService};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::QuizView;
use crate::views::quiz::QuizTestHandles;

struct TestApp {
    service: Arc<QuizService>,
    location: ViewLocation,
}

impl UiApp for TestApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.service)
    }

    fn initial_location(&self) -> ViewLocation {
        self.location.clone()
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HarnessProps {}

#[component]
fn QuizHarness(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub handles: QuizTestHandles,
    bank_path: PathBuf,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until no load or rebuild is in flight.
    pub async fn settle(&mut self) {
        for _ in 0..20 {
            self.drive_async().await;
            if !self.render().contains("Loading questions") {
                break;
            }
        }
        self.drive_async().await;
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

impl Drop for ViewHarness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.bank_path);
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn bank_json(questions: u64) -> String {
    let records: Vec<String> = (1..=questions)
        .map(|id| {
            format!(
                r#"{{"enumeration": {id}, "question": "What is item {id}?", "options": {{"A": "Alpha", "B": "Bravo"}}, "correct": ["A"]}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

pub async fn setup_quiz_harness(name: &str, questions: u64, location: &str) -> ViewHarness {
    setup_quiz_harness_with_storage(name, Some(bank_json(questions)), location, Storage::in_memory())
        .await
}

/// `bank: None` points the service at a bank file that does not exist.
pub async fn setup_quiz_harness_with_storage(
    name: &str,
    bank: Option<String>,
    location: &str,
    storage: Storage,
) -> ViewHarness {
    let bank_path = std::env::temp_dir().join(format!(
        "quiz-ui-{name}-{}.json",
        std::process::id()
    ));
    if let Some(bank) = bank {
        tokio::fs::write(&bank_path, bank).await.expect("write bank");
    }

    let service = QuizService::new(
        &storage,
        QuizConfig::new(BankSource::File(bank_path.clone())),
        Clock::fixed(fixed_now()),
    );
    let app = Arc::new(TestApp {
        service: Arc::new(service),
        location: ViewLocation::parse(location).expect("location"),
    });
    let handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        QuizHarness,
        HarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        handles,
        bank_path,
    }
}
