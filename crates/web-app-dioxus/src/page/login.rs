use dioxus::prelude::*;
use log::error;

use effort_domain::{self as domain, SessionService};
use effort_web_app as web_app;

use crate::{
    DOMAIN_SERVICE, Route, SessionContext,
    component::{
        element::{Block, CenteredBlock, Color, Message, Title},
        form::{FieldValue, FieldValueState, InputField},
    },
    handle_storage_error,
};

#[component]
pub fn Login() -> Element {
    let store = use_context::<SessionContext>();
    let navigator = use_navigator();

    let mut email = use_signal(FieldValue::<domain::Email>::default);
    let mut password = use_signal(FieldValue::<domain::Password>::default);
    let mut message = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);

    let first_access = web_app::FirstAccess::new(&email.read().input, &password.read().input);

    let submit = move |event: FormEvent| {
        event.prevent_default();
        let store = store.clone();
        async move {
            let (email, password) = (email.read().input.clone(), password.read().input.clone());
            *is_loading.write() = true;
            message.set(None);
            let result = DOMAIN_SERVICE.read().log_in(&email, &password).await;
            match result {
                Ok(session) => match store.set(session) {
                    Ok(()) => {
                        navigator.replace(Route::Home {});
                    }
                    Err(err) => {
                        error!("failed to store session: {err}");
                        message.set(Some(domain::LOGIN_FALLBACK_MESSAGE.to_string()));
                    }
                },
                Err(err) => {
                    if let domain::LoginError::Storage(ref storage) = err {
                        handle_storage_error(&store, storage);
                    }
                    message.set(Some(err.message()));
                }
            }
            *is_loading.write() = false;
        }
    };

    rsx! {
        Title { title: "Bem-vindo" }
        div {
            class: "container px-3",
            form {
                onsubmit: submit,
                InputField {
                    label: "Email".to_string(),
                    r#type: "email".to_string(),
                    inputmode: "email".to_string(),
                    autocomplete: "username".to_string(),
                    placeholder: "seu@email.com".to_string(),
                    left_icon: rsx! { i { class: "fas fa-envelope" } },
                    value: email.read().input.clone(),
                    error: email.read().error(),
                    oninput: move |event: FormEvent| {
                        email.write().update(event.value(), domain::Email::new);
                    },
                }
                InputField {
                    label: "Senha".to_string(),
                    r#type: "password".to_string(),
                    autocomplete: "current-password".to_string(),
                    left_icon: rsx! { i { class: "fas fa-lock" } },
                    value: password.read().input.clone(),
                    error: password.read().error(),
                    oninput: move |event: FormEvent| {
                        password.write().update(event.value(), domain::Password::new);
                    },
                }
                if let Some(message) = message() {
                    Block {
                        Message { color: Color::Danger, "{message}" }
                    }
                }
                div {
                    class: "field is-grouped is-grouped-centered",
                    div {
                        class: "control",
                        button {
                            class: "button is-primary",
                            class: if is_loading() { "is-loading" },
                            r#type: "submit",
                            disabled: !FieldValue::all_valid(&[&*email.read() as &dyn FieldValueState, &*password.read()]),
                            "Entrar"
                        }
                    }
                }
            }
            CenteredBlock {
                button {
                    class: "button is-text",
                    r#type: "button",
                    disabled: !first_access.is_enabled(),
                    onclick: move |_| {
                        navigator.push(Route::FirstAccess { email: email.read().input.trim().to_string() });
                    },
                    "Primeiro acesso"
                }
                if let Some(hint) = first_access.hint() {
                    p { class: "help", "{hint}" }
                }
            }
        }
    }
}
