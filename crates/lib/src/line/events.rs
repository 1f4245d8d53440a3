//! LINE webhook payloads (inbound events) and reply payloads (outbound messages).
//!
//! Only the fields the bot reads are modelled; everything else in the callback JSON is ignored.
//! Event and message types the bot does not know deserialize into an `Other` variant instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a webhook POST from LINE.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackRequest {
    /// User id of the bot that should receive the events.
    #[serde(default)]
    pub destination: String,
    /// Missing and `null` both mean no events.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<Event>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One webhook event, tagged by its `type` field.
///
/// `reply_token` is empty when LINE sends none (events delivered in standby mode);
/// such events cannot be answered.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Message {
        #[serde(rename = "replyToken", default)]
        reply_token: String,
        message: Message,
        #[serde(default)]
        source: Option<Source>,
    },
    Follow {
        #[serde(rename = "replyToken", default)]
        reply_token: String,
        #[serde(default)]
        source: Option<Source>,
    },
    Unfollow {
        #[serde(default)]
        source: Option<Source>,
    },
    Join {
        #[serde(rename = "replyToken", default)]
        reply_token: String,
        #[serde(default)]
        source: Option<Source>,
    },
    Leave {
        #[serde(default)]
        source: Option<Source>,
    },
    Postback {
        #[serde(rename = "replyToken", default)]
        reply_token: String,
        #[serde(default)]
        source: Option<Source>,
    },
    /// Any event type not listed above (beacon, memberJoined, videoPlayComplete, ...).
    #[serde(other)]
    Other,
}

/// Where an event came from (a user, group chat, or multi-person room).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl Source {
    /// Conversation id: group or room id when present, else the user id.
    pub fn conversation_id(&self) -> &str {
        self.group_id
            .as_deref()
            .or(self.room_id.as_deref())
            .or(self.user_id.as_deref())
            .unwrap_or("")
    }
}

/// Message payload of a message event, tagged by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text(TextMessage),
    Sticker(StickerMessage),
    Image { id: String },
    Video { id: String },
    Audio { id: String },
    File { id: String },
    Location { id: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextMessage {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerMessage {
    pub id: String,
    pub sticker_id: String,
    pub package_id: String,
    /// Absent for stickers without keyword metadata.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Only set for message stickers (stickers with custom text).
    #[serde(default)]
    pub text: String,
}

/// Outbound message sent with the reply API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SendMessage {
    Text { text: String },
}

impl SendMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// POST /v2/bot/message/reply body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: &'a [SendMessage],
}

/// GET /v2/bot/message/quota response. `value` is only meaningful when `kind` is `Limited`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MessageQuota {
    #[serde(rename = "type")]
    pub kind: QuotaKind,
    #[serde(default)]
    pub value: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaKind {
    /// No upper limit.
    #[default]
    None,
    Limited,
}
