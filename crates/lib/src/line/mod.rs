//! LINE Messaging API: webhook payloads, signature checks, and the API client.

mod client;
mod events;
mod platform;
mod signature;

pub use client::{LineClient, DEFAULT_API_BASE};
pub use events::{
    CallbackRequest, Event, Message, MessageQuota, QuotaKind, ReplyRequest,
    SendMessage, Source, StickerMessage, TextMessage,
};
pub use platform::{LineError, Platform};
pub use signature::{sign, verify_signature, SIGNATURE_HEADER};
