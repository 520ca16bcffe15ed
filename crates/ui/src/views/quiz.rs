use std::sync::Arc;

use dioxus::prelude::*;

use quiz_core::model::ChoiceKey;
use quiz_core::session::{ChoiceMark, ChoiceView, PageView, QuestionView, QuizAction};
use quiz_core::subset::SubsetPolicy;

use crate::context::AppContext;
use crate::views::results::ResultsView;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    QuizVm, page_size_options, parse_page_size, rebuilds_session, start_quiz, subset_options,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let resource = use_resource(move || {
        let service = ctx.quiz_service();
        let location = ctx.initial_location();
        async move { start_quiz(&service, &location).await }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quiz" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "Loading questions..." }
                },
                ViewState::Ready(vm) => rsx! {
                    QuizScreen { initial: vm }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[derive(Props, Clone)]
struct QuizScreenProps {
    initial: QuizVm,
}

// The screen owns the session once mounted.
impl PartialEq for QuizScreenProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizScreen(props: QuizScreenProps) -> Element {
    let ctx = use_context::<AppContext>();
    let vm = use_signal(|| props.initial.clone());
    let error = use_signal(|| None::<ViewError>);
    let busy = use_signal(|| false);
    let rebuilding = use_signal(|| false);

    let dispatch = {
        let service = ctx.quiz_service();
        use_callback(move |action: QuizAction| {
            let mut vm = vm;
            let mut error = error;
            let mut busy = busy;
            let mut rebuilding = rebuilding;

            if *busy.peek() {
                return;
            }
            busy.set(true);
            rebuilding.set(rebuilds_session(&action));

            let service = Arc::clone(&service);
            spawn(async move {
                let mut local = vm.peek().clone();
                let result = local.dispatch(&service, action).await;
                vm.set(local);
                error.set(result.err());
                rebuilding.set(false);
                busy.set(false);
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, vm);
            }
        }
    }

    let (page, report, policy, location) = {
        let current = vm.read();
        (
            current.page(),
            current.report().cloned(),
            current.policy(),
            current.location().to_string(),
        )
    };
    let busy_now = busy();

    rsx! {
        div { class: "quiz",
            Toolbar {
                page_size: page.page_size,
                policy,
                busy: busy_now,
                on_action: dispatch,
            }
            if let Some(err) = error() {
                div { class: "alert alert-danger", "{err.message()}" }
            }
            match (rebuilding(), report) {
                (true, _) => rsx! {
                    p { class: "loading", "Loading questions..." }
                },
                (false, Some(report)) => rsx! {
                    ResultsView { report }
                },
                (false, None) => rsx! {
                    div { class: "questions",
                        for question in page.questions.iter() {
                            QuestionCard {
                                key: "{question.position}",
                                question: question.clone(),
                                total: page.total_questions,
                                busy: busy_now,
                                on_action: dispatch,
                            }
                        }
                    }
                    Pager { page: page.clone(), busy: busy_now, on_action: dispatch }
                },
            }
            if page.reset_pending {
                ResetDialog { busy: busy_now, on_action: dispatch }
            }
            p { class: "location", "{location}" }
        }
    }
}

#[component]
fn Toolbar(
    page_size: usize,
    policy: SubsetPolicy,
    busy: bool,
    on_action: Callback<QuizAction>,
) -> Element {
    rsx! {
        div { class: "toolbar",
            label { r#for: "questions-per-page", "Questions per page" }
            select {
                id: "questions-per-page",
                disabled: busy,
                onchange: move |evt: FormEvent| {
                    if let Some(size) = parse_page_size(&evt.value()) {
                        on_action.call(QuizAction::SetPageSize(size));
                    }
                },
                for size in page_size_options(page_size) {
                    option { value: "{size}", selected: size == page_size, "{size}" }
                }
            }
            label { r#for: "total-questions", "Total questions" }
            select {
                id: "total-questions",
                disabled: busy,
                onchange: move |evt: FormEvent| {
                    let policy = SubsetPolicy::parse_lenient(&evt.value());
                    on_action.call(QuizAction::SetSubsetPolicy(policy));
                },
                for choice in subset_options(policy) {
                    option { value: "{choice}", selected: choice == policy, "{choice}" }
                }
            }
            button {
                class: "btn btn-outline-danger",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_action.call(QuizAction::RequestReset),
                "Reset Progress"
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: QuestionView,
    total: usize,
    busy: bool,
    on_action: Callback<QuizAction>,
) -> Element {
    let position = question.position;
    let correct = join_keys(&question.correct_keys);

    rsx! {
        div { class: "question",
            div { class: "mb-3",
                span { class: "badge bg-primary", "Question {question.enumeration} of {total}" }
            }
            h5 { class: "mb-3", "{question.text}" }
            form { class: "options-form",
                for choice in question.choices.iter() {
                    ChoiceRow {
                        key: "{choice.key}",
                        position,
                        choice: choice.clone(),
                        locked: busy || question.revealed,
                        on_action,
                    }
                }
            }
            button {
                class: "btn btn-outline-info btn-sm",
                r#type: "button",
                disabled: busy || question.revealed,
                onclick: move |_| on_action.call(QuizAction::Reveal { position }),
                "Reveal Answer"
            }
            if question.revealed {
                div { class: "alert alert-warning",
                    "Correct answer: "
                    b { "{correct}" }
                }
            }
            hr {}
        }
    }
}

#[component]
fn ChoiceRow(
    position: usize,
    choice: ChoiceView,
    locked: bool,
    on_action: Callback<QuizAction>,
) -> Element {
    let class = match choice.mark {
        Some(ChoiceMark::Correct) => "form-check border-success",
        Some(ChoiceMark::Incorrect) => "form-check border-danger",
        None => "form-check",
    };
    let input_id = format!("opt-{position}-{}", choice.key);
    let choice_key = choice.key.clone();

    rsx! {
        div { class: "{class}",
            input {
                class: "form-check-input",
                r#type: "radio",
                id: "{input_id}",
                name: "option-{position}",
                value: "{choice.key}",
                checked: choice.selected,
                disabled: locked,
                onchange: move |_| {
                    on_action.call(QuizAction::SelectChoice {
                        position,
                        key: choice_key.clone(),
                    });
                },
            }
            label { class: "form-check-label", r#for: "{input_id}",
                b { "{choice.key}." }
                " {choice.text}"
            }
        }
    }
}

#[component]
fn Pager(page: PageView, busy: bool, on_action: Callback<QuizAction>) -> Element {
    rsx! {
        div { class: "pager",
            div { class: "progress",
                div {
                    class: "progress-bar",
                    style: "width: {page.progress_percent}%",
                    "{page.progress_percent}%"
                }
            }
            div { class: "pager-buttons",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: busy || !page.can_prev,
                    onclick: move |_| on_action.call(QuizAction::PrevPage),
                    "Previous"
                }
                span { class: "page-indicator", "{page.indicator}" }
                if page.can_submit {
                    button {
                        class: "btn btn-success",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_action.call(QuizAction::Submit),
                        "Submit"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: busy || !page.can_next,
                        onclick: move |_| on_action.call(QuizAction::NextPage),
                        "Next"
                    }
                }
            }
            p { class: "answered", "Answered {page.answered} of {page.total_questions}" }
        }
    }
}

#[component]
fn ResetDialog(busy: bool, on_action: Callback<QuizAction>) -> Element {
    rsx! {
        div { class: "modal", role: "dialog",
            div { class: "modal-content",
                div { class: "modal-header bg-danger",
                    h5 { class: "modal-title", "Reset Progress" }
                }
                div { class: "modal-body",
                    div { class: "alert alert-danger",
                        strong { "Are you sure?" }
                        " This will erase all your answers and progress."
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_action.call(QuizAction::CancelReset),
                        "Cancel"
                    }
                    button {
                        id: "confirm-reset-btn",
                        class: "btn btn-danger",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_action.call(QuizAction::ConfirmReset),
                        "Yes, Reset"
                    }
                }
            }
        }
    }
}

pub(crate) fn join_keys(keys: &[ChoiceKey]) -> String {
    keys.iter()
        .map(ChoiceKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizAction>>>>,
    vm: Rc<RefCell<Option<Signal<QuizVm>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizAction>, vm: Signal<QuizVm>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizAction> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<QuizVm> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
