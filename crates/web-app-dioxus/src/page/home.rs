use dioxus::prelude::*;
use log::{error, warn};

use effort_domain::{self as domain, ExecutionService, PlanService};

use crate::{
    CONFIG, DOMAIN_SERVICE, Route, SessionContext,
    component::element::{
        Block, ErrorMessage, Loading, LoadingPage, NoConnection, NoData, Title, WorkoutTag,
    },
    handle_storage_error,
};

#[component]
pub fn Home() -> Element {
    let store = use_context::<SessionContext>();
    let session = use_context::<Signal<Option<domain::Session>>>();
    let navigator = use_navigator();

    let plan = use_resource(|| async { DOMAIN_SERVICE.read().get_active_plan().await });
    let executions = use_resource(|| async {
        DOMAIN_SERVICE
            .read()
            .get_recent_executions(CONFIG.recent_executions)
            .await
    });

    use_effect({
        let store = store.clone();
        move || {
            if let Some(Err(domain::ReadError::Storage(err))) = &*plan.read() {
                handle_storage_error(&store, err);
            }
            if let Some(Err(err)) = &*executions.read() {
                warn!("failed to load recent executions: {err}");
                if let domain::ReadError::Storage(err) = err {
                    handle_storage_error(&store, err);
                }
            }
        }
    });

    let name = session
        .read()
        .as_ref()
        .map(|session| session.user.name.clone())
        .unwrap_or_default();

    let log_out = move |_| {
        match store.clear() {
            Ok(()) => {
                navigator.replace(Route::Login {});
            }
            Err(err) => error!("failed to clear session: {err}"),
        }
    };

    let content = match &*plan.read() {
        Some(Ok(Some(plan))) => rsx! {
            PlanOverview { plan: plan.clone() }
            Title { title: "Escolha o treino" }
            for (index, workout) in plan.workouts.iter().enumerate() {
                WorkoutTile {
                    plan_id: plan.id.clone(),
                    index,
                    workout: workout.clone(),
                }
            }
        },
        Some(Ok(None)) => rsx! {
            NoData { text: "Nenhuma ficha ativa. Procure seu professor." }
        },
        Some(Err(domain::ReadError::Storage(domain::StorageError::NoConnection))) => rsx! {
            NoConnection {}
        },
        Some(Err(err)) => rsx! {
            ErrorMessage { message: "Erro ao carregar a ficha: {err}" }
        },
        None => rsx! { LoadingPage {} },
    };

    let history = match &*executions.read() {
        Some(result) if recent_executions(result).is_empty() => rsx! {
            NoData { text: "Nenhum treino registrado" }
        },
        Some(result) => rsx! {
            for execution in recent_executions(result) {
                ExecutionEntry { execution: execution.clone() }
            }
        },
        None => rsx! { Loading {} },
    };

    rsx! {
        div {
            class: "container px-3",
            h1 { class: "title is-4 mt-3", "Olá, {name}!" }
            {content}
            Title { title: "Últimos treinos" }
            {history}
            Block {
                class: "has-text-centered mt-6",
                button {
                    class: "button is-light is-soft",
                    onclick: log_out,
                    span { class: "icon", i { class: "fas fa-sign-out-alt" } }
                    span { "Sair" }
                }
            }
        }
    }
}

#[component]
fn PlanOverview(plan: domain::Plan) -> Element {
    rsx! {
        div {
            class: "box",
            p {
                "Válida até "
                strong { "{domain::format_date(plan.end)}" }
            }
            if let Some(instructor) = &plan.instructor {
                p {
                    "Professor: "
                    strong { "{instructor.name}" }
                }
            }
            if !plan.goals.is_empty() {
                div {
                    class: "tags mt-2",
                    for goal in &plan.goals {
                        span { class: "tag is-info is-light", "{goal}" }
                    }
                }
            }
            if let Some(notes) = &plan.nutrition_notes {
                p {
                    class: "is-size-7 has-text-grey mt-2",
                    "Nutrição: {notes}"
                }
            }
        }
    }
}

#[component]
fn WorkoutTile(plan_id: domain::PlanID, index: usize, workout: domain::Workout) -> Element {
    let navigator = use_navigator();
    let num_exercises = workout.num_exercises();

    rsx! {
        div {
            class: "grid mx-0 my-3",
            div {
                class: "cell",
                a {
                    class: "box px-4 py-3",
                    onclick: move |_| {
                        navigator.push(Route::Workout { plan_id: plan_id.clone(), workout_index: index });
                    },
                    div {
                        class: "is-flex is-align-items-center",
                        WorkoutTag {
                            letter: domain::workout_letter(index),
                            color: workout.color.clone(),
                            is_medium: true,
                        }
                        div {
                            class: "ml-3",
                            p {
                                class: "title is-size-5 has-text-link",
                                "Treino {domain::workout_letter(index)}"
                            }
                            p {
                                class: "is-size-7",
                                if num_exercises == 1 { "1 exercício" } else { "{num_exercises} exercícios" }
                            }
                        }
                    }
                    if let Some(notes) = &workout.notes {
                        p { class: "is-size-7 has-text-grey mt-2", "{notes}" }
                    }
                }
            }
        }
    }
}

#[component]
fn ExecutionEntry(execution: domain::Execution) -> Element {
    let letter = domain::workout_letter(execution.workout_index);
    let date = domain::format_date(execution.date.date_naive());
    let num_completed = execution.num_completed_exercises();
    let num_exercises = execution.exercises.len();

    rsx! {
        div {
            class: "is-flex is-align-items-center py-2",
            WorkoutTag { letter, color: execution.workout_color.clone() }
            span { class: "ml-3", "{date}" }
            span {
                class: "ml-3 is-size-7",
                "{num_completed}/{num_exercises} exercícios"
            }
            if let Some(minutes) = execution.duration_minutes {
                span { class: "ml-3 is-size-7 has-text-grey", "{minutes} min" }
            }
            if execution.completed {
                span {
                    class: "icon has-text-success ml-auto",
                    i { class: "fas fa-circle-check" }
                }
            }
        }
    }
}

/// The history is shown on a best-effort basis, a failed request shows no entries.
fn recent_executions(
    result: &Result<Vec<domain::Execution>, domain::ReadError>,
) -> &[domain::Execution] {
    match result {
        Ok(executions) => executions,
        Err(_) => &[],
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn execution() -> domain::Execution {
        domain::Execution {
            id: Some("e1".into()),
            student: "u1".into(),
            plan: "p1".into(),
            workout_index: 0,
            workout_color: "#ff0000".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap(),
            exercises: vec![],
            duration_minutes: Some(30),
            completed: true,
        }
    }

    #[test]
    fn test_recent_executions() {
        let result = Ok(vec![execution()]);
        assert_eq!(recent_executions(&result), &[execution()]);
    }

    #[rstest]
    #[case::not_found(domain::ReadError::NotFound)]
    #[case::no_connection(domain::ReadError::Storage(domain::StorageError::NoConnection))]
    #[case::rejected(domain::ReadError::Storage(domain::StorageError::Rejected {
        status: 500,
        message: Some("Erro interno".to_string()),
    }))]
    fn test_recent_executions_failed(#[case] err: domain::ReadError) {
        assert!(recent_executions(&Err(err)).is_empty());
    }
}
