use chrono::Utc;
use dioxus::prelude::*;
use log::warn;

use effort_domain::{self as domain, ExecutionService, PlanService};
use effort_web_app::{self as web_app, CompletionState, Phase};

use crate::{
    DOMAIN_SERVICE, NOTIFICATIONS, Route, SessionContext,
    component::{
        element::{
            CenteredBlock, ConfirmationDialog, ErrorMessage, Icon, LoadingPage, NoConnection,
            NoData, WorkoutTag,
        },
        form::TextareaField,
        stopwatch::Stopwatch,
    },
    handle_storage_error,
};

#[component]
pub fn Workout(plan_id: domain::PlanID, workout_index: usize) -> Element {
    let store = use_context::<SessionContext>();
    let plan = use_resource(move || {
        let plan_id = plan_id.clone();
        async move { DOMAIN_SERVICE.read().get_plan(&plan_id).await }
    });

    use_effect(move || {
        if let Some(Err(domain::ReadError::Storage(err))) = &*plan.read() {
            handle_storage_error(&store, err);
        }
    });

    match &*plan.read() {
        Some(Ok(plan)) => rsx! {
            WorkoutView { plan: plan.clone(), workout_index }
        },
        Some(Err(domain::ReadError::Storage(domain::StorageError::NoConnection))) => rsx! {
            NoConnection {}
        },
        Some(Err(domain::ReadError::NotFound)) => rsx! {
            ErrorMessage { message: "Ficha não encontrada" }
        },
        Some(Err(err)) => rsx! {
            ErrorMessage { message: "Erro ao carregar o treino: {err}" }
        },
        None => rsx! { LoadingPage {} },
    }
}

#[component]
fn WorkoutView(plan: domain::Plan, workout_index: usize) -> Element {
    let navigator = use_navigator();
    let mut session = use_signal(|| web_app::WorkoutSession::new(&plan, workout_index));
    let mut confirm_finish = use_signal(|| false);
    let mut is_finishing = use_signal(|| false);

    let letter = domain::workout_letter(workout_index);

    if session.read().is_empty() {
        return rsx! {
            NoData { text: "Este treino não possui exercícios." }
            CenteredBlock {
                button {
                    class: "button is-link",
                    onclick: move |_| { navigator.push(Route::Home {}); },
                    "Voltar"
                }
            }
        };
    }

    let phase = session.read().phase();
    let position = session.read().current();
    let len = session.read().len();

    let finish = move |_| async move {
        *is_finishing.write() = true;
        let execution = session.write().finish(Utc::now());
        if let Err(err) = DOMAIN_SERVICE.read().create_execution(execution).await {
            warn!("execution of workout {workout_index} not saved: {err}");
        }
        *is_finishing.write() = false;
        *confirm_finish.write() = false;
        navigator.push(Route::Home {});
    };

    rsx! {
        div {
            class: "container px-3",
            div {
                class: "is-flex is-align-items-center is-justify-content-space-between my-3",
                div {
                    class: "is-flex is-align-items-center",
                    WorkoutTag {
                        letter: letter.clone(),
                        color: session.read().workout_color().to_string(),
                        is_medium: true,
                    }
                    span {
                        class: "ml-3 is-size-6",
                        "{session.read().num_completed()}/{len} concluídos"
                    }
                }
                if phase != Phase::Ready {
                    Stopwatch { session }
                }
            }

            if phase == Phase::Ready {
                CenteredBlock {
                    button {
                        class: "button is-primary is-medium",
                        onclick: move |_| session.write().start(),
                        Icon { name: "play" }
                        span { "Iniciar treino" }
                    }
                }
            }

            ExerciseCard { session, position }

            nav {
                class: "is-flex is-align-items-center is-justify-content-space-between my-4",
                button {
                    class: "button",
                    disabled: !session.read().has_previous(),
                    onclick: move |_| session.write().previous(),
                    Icon { name: "chevron-left" }
                }
                div {
                    class: "is-flex is-flex-wrap-wrap is-justify-content-center",
                    for dot in 0..len {
                        a {
                            class: "mx-1 {dot_color(dot == position, session.read().is_completed(dot))}",
                            onclick: move |_| session.write().go_to(dot),
                            i {
                                class: if dot == position { "fas fa-circle" } else { "far fa-circle" },
                            }
                        }
                    }
                }
                button {
                    class: "button",
                    disabled: !session.read().has_next(),
                    onclick: move |_| session.write().next(),
                    Icon { name: "chevron-right" }
                }
            }

            if phase == Phase::Active || phase == Phase::Paused {
                CenteredBlock {
                    button {
                        class: "button is-danger is-outlined",
                        onclick: move |_| { *confirm_finish.write() = true; },
                        Icon { name: "flag-checkered" }
                        span { "Finalizar treino" }
                    }
                }
            }
        }

        if confirm_finish() {
            ConfirmationDialog {
                title: "Finalizar treino {letter}?",
                confirm_text: "Finalizar",
                confirm_event: finish,
                cancel_event: move |_| { *confirm_finish.write() = false; },
                is_loading: is_finishing(),
                "{session.read().summary()}"
            }
        }
    }
}

#[component]
fn ExerciseCard(mut session: Signal<web_app::WorkoutSession>, position: usize) -> Element {
    let store = use_context::<SessionContext>();

    let Some(entry) = session.read().current_exercise().cloned() else {
        return rsx! {};
    };
    let state = session.read().state(position);
    let notes = session.read().notes(position).to_string();
    let is_started = session.read().phase() != Phase::Ready;
    let exercise = &entry.exercise;

    let complete = move |_| {
        let store = store.clone();
        async move {
            let Some(completion) = session.write().begin_completion(position) else {
                return;
            };
            match DOMAIN_SERVICE.read().complete_exercise(completion).await {
                Ok(()) => session.write().complete_succeeded(position),
                Err(err) => {
                    if let domain::CreateError::Storage(ref storage) = err {
                        handle_storage_error(&store, storage);
                    }
                    let message = session.write().complete_failed(position);
                    NOTIFICATIONS.write().push(message.to_string());
                }
            }
        }
    };

    rsx! {
        div {
            class: "box",
            class: if state == CompletionState::Completed { "has-background-success-light" },
            if let Some(part_name) = &entry.part_name {
                p { class: "is-size-7 has-text-grey is-uppercase", "{part_name}" }
            }
            div {
                class: "is-flex is-justify-content-space-between is-align-items-start",
                div {
                    p { class: "title is-5 mb-1", "{exercise.objective}" }
                    if !exercise.equipment.is_empty() {
                        p { class: "subtitle is-6", "{exercise.equipment}" }
                    }
                }
                span { class: "tag is-light", "{position + 1}/{session.read().len()}" }
            }
            match &exercise.prescription {
                domain::Prescription::Sets(sets) => rsx! {
                    table {
                        class: "table is-fullwidth is-narrow",
                        thead {
                            tr {
                                th { "Série" }
                                th { class: "has-text-right", "Repetições" }
                            }
                        }
                        tbody {
                            for set in sets.iter() {
                                tr {
                                    td { "{set.series}" }
                                    td { class: "has-text-right", "{set.reps}" }
                                }
                            }
                        }
                    }
                },
                domain::Prescription::Duration(seconds) => rsx! {
                    p {
                        class: "is-size-5 my-3",
                        Icon { name: "stopwatch" }
                        "{domain::format_duration(u64::from(*seconds))}"
                    }
                },
            }
            if let Some(details) = &exercise.details {
                p { class: "is-size-7 has-text-grey mb-3", "{details}" }
            }
            TextareaField {
                label: "Anotações",
                placeholder: "Carga, ajustes, observações",
                value: notes,
                is_disabled: state != CompletionState::Pending,
                oninput: move |event: FormEvent| {
                    session.write().set_notes(position, &event.value());
                },
            }
            CenteredBlock {
                if state == CompletionState::Completed {
                    span {
                        class: "tag is-success is-medium",
                        Icon { name: "check", is_small: true }
                        span { "Concluído" }
                    }
                } else {
                    button {
                        class: "button is-success",
                        class: if state == CompletionState::Saving { "is-loading" },
                        disabled: !is_started || state == CompletionState::Saving,
                        onclick: complete,
                        Icon { name: "check" }
                        span { "Concluir exercício" }
                    }
                }
            }
        }
    }
}

fn dot_color(is_current: bool, is_completed: bool) -> &'static str {
    if is_current {
        "has-text-link"
    } else if is_completed {
        "has-text-success"
    } else {
        "has-text-grey-light"
    }
}
