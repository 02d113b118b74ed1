use dioxus::prelude::*;
use log::error;

use effort_domain as domain;
use effort_web_app::auth_gate::{self, Gate};

use crate::{
    NO_CONNECTION, NOTIFICATIONS, Route, SessionContext,
    component::element::{ElementWithDescription, Icon, LoadingPage},
};

/// Layout of all pages.
///
/// Applies the auth gate on every navigation before the page itself is rendered.
#[component]
pub fn Navbar() -> Element {
    let mut menu_visible = use_signal(|| false);
    let store = use_context::<SessionContext>();
    let session = use_context::<Signal<Option<domain::Session>>>();
    let navigator = use_navigator();
    let route = use_route::<Route>();

    let gate = auth_gate::decide(route.access(), session.read().is_some());
    match gate {
        Gate::Allow | Gate::ClearSession => {}
        Gate::ClearSessionAndRedirectToLogin => {
            navigator.replace(Route::Login {});
        }
        Gate::RedirectToHome => {
            navigator.replace(Route::Home {});
        }
    }
    if matches!(
        gate,
        Gate::ClearSession | Gate::ClearSessionAndRedirectToLogin
    ) {
        if let Err(err) = store.clear() {
            error!("failed to clear session: {err}");
        }
    }

    let user = session.read().as_ref().map(|session| session.user.clone());
    let page_title = match &route {
        Route::Login {} => "Effort Academy".to_string(),
        Route::FirstAccess { .. } => "Primeiro acesso".to_string(),
        Route::Home {} => "Meus treinos".to_string(),
        Route::Workout { workout_index, .. } => {
            format!("Treino {}", domain::workout_letter(*workout_index))
        }
        Route::NotFound { .. } => String::new(),
    };
    let go_up_target = match route {
        Route::Login {} | Route::Home {} => None,
        Route::FirstAccess { .. } => Some(Route::Login {}),
        Route::Workout { .. } | Route::NotFound { .. } => Some(Route::Home {}),
    };

    rsx! {
        nav {
            class: "navbar is-fixed-top is-primary has-shadow has-text-weight-bold",
            div {
                class: "container",
                div {
                    class: "navbar-brand is-flex-grow-1",
                    a {
                        class: "navbar-item is-size-5",
                        class: if go_up_target.is_none() { "has-text-primary" },
                        Icon {
                            name: "chevron-left",
                            onclick: {
                                let go_up_target = go_up_target.clone();
                                move |_| {
                                    if let Some(go_up_target) = &go_up_target {
                                        navigator.push(go_up_target.clone());
                                    }
                                }
                            },
                        }
                    }
                    div { class: "navbar-item is-size-5", "{page_title}" }
                    div { class: "mx-auto" }
                    if NO_CONNECTION() {
                        a {
                            class: "navbar-item",
                            class: "is-size-5",
                            class: "mx-1",
                            ElementWithDescription {
                                description: "Sem conexão com o servidor",
                                right_aligned: true,
                                Icon { name: "plug-circle-xmark" }
                            }
                        }
                    }
                    if user.is_some() {
                        a {
                            aria_expanded: menu_visible(),
                            aria_label: "menu",
                            class: "navbar-burger ml-0",
                            class: if menu_visible() { "is-active" },
                            role: "button",
                            onclick: move |_| { *menu_visible.write() = !menu_visible() },
                            span { aria_hidden: "true" }
                            span { aria_hidden: "true" }
                            span { aria_hidden: "true" }
                            span { aria_hidden: "true" }
                        }
                    }
                }
                if let Some(user) = user {
                    div {
                        class: "navbar-menu is-flex-grow-0",
                        class: if menu_visible() { "is-active" },
                        div {
                            class: "navbar-end",
                            a {
                                class: "navbar-item",
                                onclick: move |_| {
                                    *menu_visible.write() = false;
                                    match store.clear() {
                                        Ok(()) => {
                                            navigator.replace(Route::Login {});
                                        }
                                        Err(err) => {
                                            NOTIFICATIONS
                                                .write()
                                                .push(format!("Falha ao sair: {err}"));
                                        }
                                    }
                                },
                                Icon { name: "sign-out-alt", px: 5 }
                                "Sair ({user.name})"
                            }
                        }
                    }
                }
            }
        }

        if gate == Gate::Allow || gate == Gate::ClearSession {
            Outlet::<Route> {}
        } else {
            LoadingPage {}
        }
    }
}
