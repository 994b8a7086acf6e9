use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use metego_core::{
    Credentials, ForecastRequest, Notifier, Recipient, http, notifier_from_credentials,
    provider_from_credentials,
};

use crate::app::{self, Delivery};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "metego",
    version,
    about = "Multi-day weather forecast, optionally sent through Pushover"
)]
pub struct Cli {
    /// Wanted city for the forecast.
    #[arg(long, env = "METEGO_CITY", default_value = "Paris")]
    pub city: String,

    /// Wanted number of days to forecast (1 to 5).
    #[arg(long, env = "METEGO_DAYS", default_value_t = 5)]
    pub days: u32,

    /// Set logging to debug level.
    #[arg(long)]
    pub debug: bool,

    /// Send the forecast to Pushover.
    #[arg(long)]
    pub pushover: bool,

    /// Credentials file, one `<name> <token>` pair per line.
    /// Defaults to ./tokens.txt, then the platform config directory.
    #[arg(long, env = "METEGO_TOKENS")]
    pub tokens: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = self.tokens.unwrap_or_else(Credentials::default_path);
        let credentials = Credentials::load(&path).context("Error when getting tokens from file")?;

        let client = http::client(http::TIMEOUT)?;
        let provider = provider_from_credentials(&credentials, client.clone())
            .context("Error when creating an OpenWeather client")?;
        let pushover = pushover_target(self.pushover, &credentials, client)?;

        let request = ForecastRequest::new(self.city, self.days)
            .context("Error when creating a forecast request")?;

        let mut stdout = std::io::stdout().lock();
        app::run(&request, provider.as_ref(), delivery(&pushover), &mut stdout).await
    }
}

type PushoverTarget = (Box<dyn Notifier>, Recipient);

/// Pushover client and recipient, built only when the toggle is on.
fn pushover_target(
    enabled: bool,
    credentials: &Credentials,
    client: http::Client,
) -> anyhow::Result<Option<PushoverTarget>> {
    if !enabled {
        return Ok(None);
    }
    let target = notifier_from_credentials(credentials, client)
        .context("Error when creating a Pushover client")?;
    Ok(Some(target))
}

fn delivery(target: &Option<PushoverTarget>) -> Option<Delivery<'_>> {
    target.as_ref().map(|(notifier, recipient)| Delivery {
        notifier: &**notifier,
        recipient,
    })
}
