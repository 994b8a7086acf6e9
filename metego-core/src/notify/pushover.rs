use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{MetegoError, Result},
    http::truncate_body,
    model::{Message, Receipt, Recipient},
};

use super::Notifier;

const PROVIDER: &str = "Pushover";
const DEFAULT_BASE_URL: &str = "https://api.pushover.net";
const MESSAGES_PATH: &str = "/1/messages.json";

/// Client for the Pushover message API.
#[derive(Clone)]
pub struct PushoverNotifier {
    app_token: String,
    base_url: String,
    http: Client,
}

impl PushoverNotifier {
    pub fn new(app_token: impl Into<String>, http: Client) -> Result<Self> {
        let app_token = app_token.into();
        if app_token.is_empty() {
            return Err(MetegoError::EmptyToken { provider: PROVIDER });
        }
        Ok(Self {
            app_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for PushoverNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverNotifier")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Both success and error replies share this shape; `status` is 1 on success.
#[derive(Debug, Deserialize)]
struct PoResponse {
    status: i64,
    #[serde(default)]
    request: String,
    #[serde(default)]
    errors: Vec<String>,
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, message: &Message, recipient: &Recipient) -> Result<Receipt> {
        message.validate()?;

        let mut form = vec![
            ("token", self.app_token.as_str()),
            ("user", recipient.as_str()),
            ("message", message.body.as_str()),
        ];
        if let Some(title) = &message.title {
            form.push(("title", title.as_str()));
        }

        let url = format!("{}{MESSAGES_PATH}", self.base_url);
        debug!(%url, chars = message.body.chars().count(), "sending notification");

        let res = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|source| MetegoError::Transport { provider: PROVIDER, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| MetegoError::Transport { provider: PROVIDER, source })?;

        let parsed = serde_json::from_str::<PoResponse>(&body);

        if !status.is_success() {
            // 4xx replies carry the reasons in `errors`; anything else is reported raw.
            return Err(match parsed {
                Ok(reply) if !reply.errors.is_empty() => MetegoError::Delivery {
                    status: Some(status),
                    errors: reply.errors,
                },
                _ => MetegoError::Status {
                    provider: PROVIDER,
                    status,
                    body: truncate_body(&body),
                },
            });
        }

        let reply = parsed.map_err(|source| MetegoError::Decode { provider: PROVIDER, source })?;
        if reply.status != 1 {
            return Err(MetegoError::Delivery { status: None, errors: reply.errors });
        }

        debug!(request = %reply.request, "notification accepted");
        Ok(Receipt { request: reply.request })
    }
}
