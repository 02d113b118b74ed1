use dioxus::prelude::*;
use futures_util::StreamExt;
use gloo_timers::future::IntervalStream;

use effort_web_app as web_app;

use crate::CONFIG;

/// Shows the elapsed time of the session and advances it while the component is mounted.
#[component]
pub fn Stopwatch(mut session: Signal<web_app::WorkoutSession>) -> Element {
    use_coroutine(move |_: UnboundedReceiver<()>| async move {
        let mut interval = IntervalStream::new(CONFIG.tick_interval_ms);
        loop {
            interval.next().await;
            if session.peek().phase() == web_app::Phase::Active {
                session.write().tick();
            }
        }
    });

    let phase = session.read().phase();

    rsx! {
        div {
            class: "is-size-3 has-text-weight-bold has-text-centered",
            class: if phase == web_app::Phase::Paused { "is-blinking" },
            onclick: move |_| {
                session.write().toggle_pause();
            },
            "{session.read().elapsed_display()}"
        }
    }
}
