use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use effort_domain::{self as domain, SessionService};

use crate::{
    CONFIG, DOMAIN_SERVICE, Route, SessionContext,
    component::{
        element::{Block, CenteredBlock, Color, IconText, Message, Title},
        form::{FieldValue, FieldValueState, InputField},
    },
    handle_storage_error,
};

#[component]
pub fn FirstAccess(email: String) -> Element {
    let is_email_locked = !email.trim().is_empty();
    let store = use_context::<SessionContext>();
    let navigator = use_navigator();

    let mut email = use_signal(|| FieldValue::new(email.trim().to_string(), domain::Email::new));
    let mut password = use_signal(FieldValue::<domain::Password>::default);
    let mut confirmation = use_signal(String::new);
    let mut message = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);
    let mut is_done = use_signal(|| false);

    let confirmation_error = match &password.read().validated {
        Ok(password) if !confirmation.read().is_empty() => password
            .confirm(&confirmation.read())
            .err()
            .map(|err| err.to_string()),
        _ => None,
    };
    let is_valid =
        FieldValue::all_valid(&[&*email.read() as &dyn FieldValueState, &*password.read()])
            && !confirmation.read().is_empty()
            && confirmation_error.is_none();

    let submit = move |event: FormEvent| {
        event.prevent_default();
        let store = store.clone();
        async move {
            let (email, password, confirmation) = (
                email.read().input.clone(),
                password.read().input.clone(),
                confirmation(),
            );
            *is_loading.write() = true;
            message.set(None);
            let result = DOMAIN_SERVICE
                .read()
                .set_initial_password(&email, &password, &confirmation)
                .await;
            *is_loading.write() = false;
            match result {
                Ok(()) => {
                    is_done.set(true);
                    TimeoutFuture::new(CONFIG.redirect_delay_ms).await;
                    navigator.replace(Route::Login {});
                }
                Err(err) => {
                    if let domain::FirstAccessError::Storage(ref storage) = err {
                        handle_storage_error(&store, storage);
                    }
                    message.set(Some(err.message()));
                }
            }
        }
    };

    if is_done() {
        return rsx! {
            CenteredBlock {
                div {
                    class: "title is-4 has-text-success mt-6",
                    IconText { icon: "circle-check", text: "Senha Definida!" }
                }
                p { "Você será redirecionado para o login." }
            }
        };
    }

    rsx! {
        Title { title: "Definir senha" }
        div {
            class: "container px-3",
            form {
                onsubmit: submit,
                InputField {
                    label: "Email".to_string(),
                    r#type: "email".to_string(),
                    inputmode: "email".to_string(),
                    autocomplete: "username".to_string(),
                    left_icon: rsx! { i { class: "fas fa-envelope" } },
                    value: email.read().input.clone(),
                    error: email.read().error(),
                    is_disabled: is_email_locked,
                    oninput: move |event: FormEvent| {
                        email.write().update(event.value(), domain::Email::new);
                    },
                }
                InputField {
                    label: "Nova senha".to_string(),
                    r#type: "password".to_string(),
                    autocomplete: "new-password".to_string(),
                    left_icon: rsx! { i { class: "fas fa-lock" } },
                    help: format!("Mínimo de {} caracteres", domain::NEW_PASSWORD_MIN_LENGTH),
                    value: password.read().input.clone(),
                    error: password.read().error(),
                    oninput: move |event: FormEvent| {
                        password.write().update(event.value(), domain::Password::new_initial);
                    },
                }
                InputField {
                    label: "Confirmar senha".to_string(),
                    r#type: "password".to_string(),
                    autocomplete: "new-password".to_string(),
                    left_icon: rsx! { i { class: "fas fa-lock" } },
                    value: confirmation(),
                    error: confirmation_error,
                    oninput: move |event: FormEvent| {
                        confirmation.set(event.value());
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
                            class: "button is-light is-soft",
                            r#type: "button",
                            onclick: move |_| { navigator.replace(Route::Login {}); },
                            "Já tenho senha"
                        }
                    }
                    div {
                        class: "control",
                        button {
                            class: "button is-primary",
                            class: if is_loading() { "is-loading" },
                            r#type: "submit",
                            disabled: !is_valid,
                            "Definir senha"
                        }
                    }
                }
            }
        }
    }
}
