use crate::{
    Credentials,
    credentials::{PUSHOVER, RECIPIENT},
    error::Result,
    model::{Message, Receipt, Recipient},
    notify::pushover::PushoverNotifier,
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod pushover;

#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Deliver one message to one recipient.
    async fn send(&self, message: &Message, recipient: &Recipient) -> Result<Receipt>;
}

/// Construct the Pushover notifier and its recipient from the loaded credentials.
pub fn notifier_from_credentials(
    credentials: &Credentials,
    http: Client,
) -> Result<(Box<dyn Notifier>, Recipient)> {
    let token = credentials.require(PUSHOVER)?;
    let recipient = Recipient::new(credentials.require(RECIPIENT)?)?;
    Ok((Box::new(PushoverNotifier::new(token, http)?), recipient))
}
