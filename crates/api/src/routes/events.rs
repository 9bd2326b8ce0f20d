use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use quire_core::events::ContentEvent;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// Server-sent stream of content mutation events.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/events", get(listen))
}

async fn listen(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_bus().subscribe();
    tracing::debug!(subscribers = state.event_bus().subscriber_count(), "event listener attached");

    let welcome = stream::once(async { Ok::<_, Infallible>(to_sse(&ContentEvent::Welcome)) });
    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((Ok(to_sse(&event)), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event listener lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(welcome.chain(updates)).keep_alive(KeepAlive::default())
}

fn to_sse(event: &ContentEvent) -> Event {
    let name = match event {
        ContentEvent::Welcome => "welcome",
        _ => "mutation",
    };
    // ContentEvent contains only strings, numbers and timestamps.
    Event::default()
        .event(name)
        .data(serde_json::to_string(event).unwrap_or_default())
}
