use std::time::Duration;

pub use reqwest::Client;

use crate::error::{MetegoError, Result};

/// Every outbound call gives up after this long.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by the forecast and notification clients.
pub fn client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("metego/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(MetegoError::HttpClient)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
