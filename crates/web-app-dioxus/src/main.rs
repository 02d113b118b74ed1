#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

use std::{
    rc::Rc,
    sync::{Arc, LazyLock, Mutex},
};

use dioxus::prelude::*;
use log::error;

use effort_domain as domain;
use effort_storage as storage;
use effort_web_app::{self as web_app, auth_gate};

use component::{
    element::{Color, Dialog},
    navbar::Navbar,
};
use page::{
    first_access::FirstAccess, home::Home, login::Login, not_found::NotFound, workout::Workout,
};

mod component;
mod page;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/primeiro-acesso?:email")]
    FirstAccess { email: String },
    #[route("/treino/:plan_id/:workout_index")]
    Workout { plan_id: domain::PlanID, workout_index: usize },
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

impl Route {
    fn access(&self) -> auth_gate::Access {
        match self {
            Route::Login {} | Route::FirstAccess { .. } => auth_gate::Access::Public,
            Route::Home {} | Route::Workout { .. } | Route::NotFound { .. } => {
                auth_gate::Access::Protected
            }
        }
    }
}

const BULMA_CSS: &str = "https://cdn.jsdelivr.net/npm/bulma@1.0.4/css/bulma.min.css";
const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.7.2/css/all.min.css";

static CONFIG: LazyLock<web_app::Config> = LazyLock::new(web_app::Config::default);

static DOMAIN_SERVICE: GlobalSignal<
    domain::Service<storage::rest::REST<storage::rest::GlooNetSendRequest>>,
> = Signal::global(|| {
    domain::Service::new(storage::rest::REST::new(&CONFIG.api_base_url))
});
static NOTIFICATIONS: GlobalSignal<Vec<String>> = Signal::global(Vec::new);
static NO_CONNECTION: GlobalSignal<bool> = Signal::global(|| false);

/// The session store shared by all pages.
type SessionContext = Rc<web_app::SessionStore<storage::local_storage::LocalStorage>>;

fn main() {
    init_logging();
    dioxus::launch(App);
}

fn init_logging() {
    let _ = web_app::log::init(Arc::new(Mutex::new(storage::local_storage::LocalStorage)));
}

#[component]
fn App() -> Element {
    std::panic::set_hook(Box::new(|info| {
        error!("{info}");
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("main"))
            .map(|el| {
                el.set_inner_html(&format!("
                    <section class=\"section\">
                        <div class=\"container\">
                            <div class=\"message is-danger\">
                                <div class=\"message-header\">
                                    <p>Algo deu errado</p>
                                </div>
                                <div class=\"message-body\">
                                    <div class=\"block\">
                                        Ocorreu um erro inesperado e o aplicativo não pode continuar.
                                    </div>
                                    <div class=\"block\">
                                        <pre>{info}</pre>
                                    </div>
                                    <div class=\"block field is-grouped is-grouped-centered\">
                                        <button class=\"button\" onclick=\"location.reload()\">
                                            <span class=\"icon\">
                                                <i class=\"fa fa-arrow-rotate-right\"></i>
                                            </span>
                                            <span>Recarregar página</span>
                                        </button>
                                    </div>
                                </div>
                            </div>
                        </div>
                    </section>
                "));
                Some(())
            });
    }));

    let store: SessionContext = use_context_provider(|| {
        Rc::new(web_app::SessionStore::new(
            storage::local_storage::LocalStorage,
        ))
    });
    let session = use_context_provider(|| Signal::new(store.session()));
    let subscription = use_hook(|| {
        store.subscribe(move |current| {
            let mut session = session;
            if *session.peek() != current.cloned() {
                session.set(current.cloned());
            }
        })
    });
    use_drop({
        let store = store.clone();
        move || store.unsubscribe(subscription)
    });

    rsx! {
        document::Link { rel: "stylesheet", href: BULMA_CSS }
        document::Link { rel: "stylesheet", href: FONT_AWESOME_CSS }

        div {
            class: "container is-max-desktop py-4",
            Router::<Route> {},
            Notification {}
        }
    }
}

#[component]
fn Notification() -> Element {
    let notification = NOTIFICATIONS.read().last().cloned();

    rsx! {
        if let Some(message) = notification {
            Dialog {
                color: Color::Danger,
                title: rsx! { "Erro" },
                close_event: move |_| { let _ = NOTIFICATIONS.write().pop(); },
                div {
                    class: "block",
                    "{message}"
                }
                div {
                    class: "field is-grouped is-grouped-centered",
                    div {
                        class: "control",
                        button {
                            class: "button is-danger",
                            onclick: move |_| { let _ = NOTIFICATIONS.write().pop(); },
                            "Fechar"
                        }
                    }
                }
            }
        }
    }
}

/// Reacts to a failed request.
///
/// A lost connection is shown in the navbar. A token refused by the server ends the session,
/// after which the auth gate sends the user back to the login page.
fn handle_storage_error(store: &SessionContext, err: &domain::StorageError) {
    match err {
        domain::StorageError::NoConnection => {
            *NO_CONNECTION.write() = true;
        }
        domain::StorageError::NoSession => {
            if let Err(err) = store.clear() {
                error!("failed to clear session: {err}");
            }
        }
        domain::StorageError::Rejected { .. } | domain::StorageError::Other(_) => {}
    }
}
