use dioxus::prelude::*;

use crate::{Route, component::element::ErrorMessage};

#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let navigator = use_navigator();
    let path = route.join("/");

    rsx! {
        ErrorMessage { message: "Página não encontrada: /{path}" }
        div {
            class: "block has-text-centered",
            button {
                class: "button is-link",
                onclick: move |_| { navigator.replace(Route::Home {}); },
                "Ir para o início"
            }
        }
    }
}
