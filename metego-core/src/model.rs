use chrono::NaiveDateTime;

use crate::error::{MetegoError, Result};

/// A validated forecast request: a city and how many days to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    city: String,
    days: u32,
}

impl ForecastRequest {
    pub const MIN_DAYS: u32 = 1;
    /// The free 5 day / 3 hour forecast never reaches further.
    pub const MAX_DAYS: u32 = 5;

    pub fn new(city: impl Into<String>, days: u32) -> Result<Self> {
        let city = city.into().trim().to_string();
        if city.is_empty() {
            return Err(MetegoError::EmptyCity);
        }
        if !(Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) {
            return Err(MetegoError::InvalidDays {
                days,
                min: Self::MIN_DAYS,
                max: Self::MAX_DAYS,
            });
        }
        Ok(Self { city, days })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Heading printed above the forecast and used as the first notification title.
    pub fn title(&self) -> String {
        format!("Weather forecast for {} ({} day(s))", self.city, self.days)
    }
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub humidity: f64,
    pub temperature: f64,
    pub descriptions: Vec<String>,
}

/// A push notification body with an optional title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub body: String,
    pub title: Option<String>,
}

impl Message {
    pub const MAX_BODY_CHARS: usize = 1024;
    pub const MAX_TITLE_CHARS: usize = 250;

    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into(), title: None }
    }

    pub fn with_title(body: impl Into<String>, title: impl Into<String>) -> Self {
        Self { body: body.into(), title: Some(title.into()) }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> {
            Err(MetegoError::InvalidMessage { reason })
        };

        if self.body.trim().is_empty() {
            return invalid("body is empty".to_string());
        }
        let body_len = self.body.chars().count();
        if body_len > Self::MAX_BODY_CHARS {
            return invalid(format!(
                "body has {body_len} characters, limit is {}",
                Self::MAX_BODY_CHARS
            ));
        }
        if let Some(title) = &self.title {
            let title_len = title.chars().count();
            if title_len > Self::MAX_TITLE_CHARS {
                return invalid(format!(
                    "title has {title_len} characters, limit is {}",
                    Self::MAX_TITLE_CHARS
                ));
            }
        }
        Ok(())
    }
}

/// A Pushover user or group key.
#[derive(Clone, PartialEq, Eq)]
pub struct Recipient(String);

impl Recipient {
    const KEY_LEN: usize = 30;

    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.len() != Self::KEY_LEN || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MetegoError::InvalidRecipient);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Recipient({}…)", &self.0[..4])
    }
}

/// Acknowledgment returned by the notification provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub request: String,
}
