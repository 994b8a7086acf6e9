//! Core library for the `metego` CLI.
//!
//! This crate defines:
//! - Credential loading
//! - The OpenWeather forecast client and the per-day formatter
//! - The Pushover notification client
//! - Shared domain models and the error type
//!
//! It is used by `metego-cli`, but the clients take an explicit
//! `reqwest::Client` and base URL so they can be reused or faked.

pub mod credentials;
pub mod error;
pub mod format;
pub mod http;
pub mod model;
pub mod notify;
pub mod provider;

pub use credentials::Credentials;
pub use error::{MetegoError, Result};
pub use format::format_forecast;
pub use model::{ForecastEntry, ForecastRequest, Message, Receipt, Recipient};
pub use notify::{Notifier, notifier_from_credentials};
pub use provider::{ForecastProvider, provider_from_credentials};
