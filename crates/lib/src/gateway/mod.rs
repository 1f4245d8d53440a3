//! Gateway: the HTTP side of the bot.
//!
//! `POST /callback` receives LINE webhooks and replies to text and sticker messages;
//! `GET /` is a health probe.

mod callback;
mod server;

pub use callback::{callback, handle_events, rejection_status, sticker_reply, text_reply};
pub use server::{router, run_server, ServerState};
