//! LINE Messaging API client (https://api.line.me by default).

use anyhow::Context;
use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::config::{self, Config};
use crate::line::events::{CallbackRequest, Event, MessageQuota, ReplyRequest, SendMessage};
use crate::line::platform::{LineError, Platform};
use crate::line::signature::{verify_signature, SIGNATURE_HEADER};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";

/// Client for one LINE channel: verifies callbacks with the channel secret and calls the API with the access token.
#[derive(Clone)]
pub struct LineClient {
    channel_secret: String,
    access_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl LineClient {
    pub fn new(channel_secret: String, access_token: String, api_base: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            channel_secret,
            access_token,
            api_base,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from resolved config. Fails when the channel secret or access token is missing.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let channel_secret = config::resolve_channel_secret(config).with_context(|| {
            format!(
                "LINE channel secret not configured (set {} or line.channelSecret)",
                config::CHANNEL_SECRET_ENV
            )
        })?;
        let access_token = config::resolve_channel_access_token(config).with_context(|| {
            format!(
                "LINE channel access token not configured (set {} or line.channelAccessToken)",
                config::CHANNEL_ACCESS_TOKEN_ENV
            )
        })?;
        Ok(Self::new(
            channel_secret,
            access_token,
            config.line.api_base.clone(),
        ))
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Check `x-line-signature` against the raw body, then decode the callback JSON.
    pub fn parse_request(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Vec<Event>, LineError> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(LineError::InvalidSignature)?;
        if !verify_signature(&self.channel_secret, body, signature) {
            return Err(LineError::InvalidSignature);
        }
        let request: CallbackRequest = serde_json::from_slice(body)?;
        log::debug!(
            "callback for {} with {} event(s)",
            request.destination,
            request.events.len()
        );
        Ok(request.events)
    }

    /// GET /v2/bot/message/quota: this month's message limit.
    pub async fn message_quota(&self) -> Result<MessageQuota, LineError> {
        let url = format!("{}/v2/bot/message/quota", self.api_base);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let res = check_status(res).await?;
        Ok(res.json().await?)
    }

    /// POST /v2/bot/message/reply: answer an event using its reply token.
    pub async fn reply_message(
        &self,
        reply_token: &str,
        messages: Vec<SendMessage>,
    ) -> Result<(), LineError> {
        let url = format!("{}/v2/bot/message/reply", self.api_base);
        let body = ReplyRequest {
            reply_token,
            messages: &messages,
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, LineError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    Err(LineError::Api(format!("{} {}", status, body)))
}

#[async_trait]
impl Platform for LineClient {
    fn parse_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<Vec<Event>, LineError> {
        LineClient::parse_request(self, headers, body)
    }

    async fn message_quota(&self) -> Result<MessageQuota, LineError> {
        LineClient::message_quota(self).await
    }

    async fn reply_message(
        &self,
        reply_token: &str,
        messages: Vec<SendMessage>,
    ) -> Result<(), LineError> {
        LineClient::reply_message(self, reply_token, messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::events::Message;
    use crate::line::signature::sign;
    use axum::http::HeaderValue;

    const SECRET: &str = "channel-secret";

    fn client() -> LineClient {
        LineClient::new(SECRET.to_string(), "token".to_string(), None)
    }

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&sign(SECRET, body)).unwrap(),
        );
        headers
    }

    #[test]
    fn api_base_defaults_and_trims_trailing_slash() {
        assert_eq!(client().api_base(), DEFAULT_API_BASE);
        let c = LineClient::new(
            SECRET.to_string(),
            "token".to_string(),
            Some("http://127.0.0.1:9000/".to_string()),
        );
        assert_eq!(c.api_base(), "http://127.0.0.1:9000");
    }

    #[test]
    fn parse_request_returns_events_for_signed_body() {
        let body = br#"{"destination":"U1","events":[{"type":"message","replyToken":"r","message":{"type":"text","id":"1","text":"hi"}}]}"#;
        let events = client().parse_request(&signed_headers(body), body).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Event::Message { message: Message::Text(t), .. } if t.text == "hi"));
    }

    #[test]
    fn parse_request_keeps_events_after_standby_event_without_reply_token() {
        let body = br#"{"destination":"U1","events":[
            {"type":"message","mode":"standby","source":{"type":"user","userId":"U2"},"message":{"type":"text","id":"1","text":"quiet"}},
            {"type":"message","mode":"active","replyToken":"r2","message":{"type":"text","id":"2","text":"hi"}}
        ]}"#;
        let events = client().parse_request(&signed_headers(body), body).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Event::Message { reply_token, .. } if reply_token.is_empty()));
        assert!(matches!(&events[1], Event::Message { reply_token, .. } if reply_token == "r2"));
    }

    #[test]
    fn parse_request_accepts_null_events() {
        let body = br#"{"destination":"U1","events":null}"#;
        let events = client().parse_request(&signed_headers(body), body).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn parse_request_rejects_missing_or_wrong_signature() {
        let body = br#"{"events":[]}"#;
        let err = client().parse_request(&HeaderMap::new(), body).unwrap_err();
        assert!(matches!(err, LineError::InvalidSignature));

        let headers = signed_headers(br#"{"events":[{}]}"#);
        let err = client().parse_request(&headers, body).unwrap_err();
        assert!(matches!(err, LineError::InvalidSignature));
    }

    #[test]
    fn parse_request_reports_malformed_json_after_signature_check() {
        let body = b"not json";
        let err = client().parse_request(&signed_headers(body), body).unwrap_err();
        assert!(matches!(err, LineError::Parse(_)));
    }
}
