//! POST /callback: verify and parse the LINE webhook, then answer text and sticker messages.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
};

use crate::gateway::server::ServerState;
use crate::line::{
    Event, LineError, Message, MessageQuota, Platform, SendMessage, Source, StickerMessage,
};

/// Reply text for a text message: echoes the message id and text plus the remaining quota.
pub fn text_reply(message_id: &str, text: &str, remaining: i64) -> String {
    format!(
        "msg ID:{}:Get:{} , \n OK! remain message:{}",
        message_id, text, remaining
    )
}

/// Reply text for a sticker message. Every keyword is prefixed with a comma, including the first.
pub fn sticker_reply(sticker: &StickerMessage) -> String {
    let kw: String = sticker
        .keywords
        .iter()
        .map(|k| format!(",{}", k))
        .collect();
    format!(
        "收到貼圖訊息: {}, pkg: {} kw: {}  text: {}",
        sticker.sticker_id, sticker.package_id, kw, sticker.text
    )
}

/// Status for a callback that could not be parsed: 400 for a bad signature, 500 otherwise.
pub fn rejection_status(err: &LineError) -> StatusCode {
    match err {
        LineError::InvalidSignature => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /callback: rejects bad requests with an empty 400/500; otherwise handles every event and returns 200.
pub async fn callback(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    let parsed = body
        .map_err(|e| LineError::Body(e.body_text()))
        .and_then(|body| state.platform.parse_request(&headers, &body));
    let events = match parsed {
        Ok(events) => events,
        Err(e) => {
            log::debug!("callback rejected: {}", e);
            return rejection_status(&e);
        }
    };
    handle_events(state.platform.as_ref(), &events).await;
    StatusCode::OK
}

/// Handle events one after another, in order. Failures are logged and never stop later events.
pub async fn handle_events(platform: &dyn Platform, events: &[Event]) {
    for event in events {
        handle_event(platform, event).await;
    }
}

async fn handle_event(platform: &dyn Platform, event: &Event) {
    let Event::Message {
        reply_token,
        message,
        source,
    } = event
    else {
        return;
    };
    if reply_token.is_empty() {
        log::debug!(
            "message from {} has no reply token, not answering",
            source.as_ref().map(Source::conversation_id).unwrap_or("unknown")
        );
        return;
    }

    let reply = match message {
        Message::Text(text) => {
            let quota = match platform.message_quota().await {
                Ok(q) => q,
                Err(e) => {
                    log::warn!("message quota lookup failed: {}", e);
                    MessageQuota::default()
                }
            };
            text_reply(&text.id, &text.text, quota.value)
        }
        Message::Sticker(sticker) => sticker_reply(sticker),
        // Media, location and unrecognised kinds are accepted without a reply.
        Message::Image { .. }
        | Message::Video { .. }
        | Message::Audio { .. }
        | Message::File { .. }
        | Message::Location { .. }
        | Message::Other => return,
    };

    if let Err(e) = platform
        .reply_message(reply_token, vec![SendMessage::text(reply)])
        .await
    {
        log::warn!("reply failed: {}", e);
    }
}
