use std::io::Write;

use anyhow::{Context, Result};
use metego_core::{ForecastProvider, ForecastRequest, Message, Notifier, Recipient};
use tracing::{debug, info};

/// Where the forecast goes after it is printed.
pub struct Delivery<'a> {
    pub notifier: &'a dyn Notifier,
    pub recipient: &'a Recipient,
}

/// Fetch the forecast, print it to `out`, then hand it to `delivery` if any.
///
/// Nothing is sent unless the fetch succeeded, and the first failed send
/// stops the remaining ones.
pub async fn run<W: Write>(
    request: &ForecastRequest,
    provider: &dyn ForecastProvider,
    delivery: Option<Delivery<'_>>,
    out: &mut W,
) -> Result<()> {
    let forecast = provider
        .forecast(request)
        .await
        .with_context(|| format!("Failed to get forecast for {}", request.city()))?;

    let title = request.title();
    debug!("{title}");
    debug!(days = forecast.len(), "forecast formatted");

    writeln!(out, "{title}")?;
    for day in &forecast {
        writeln!(out, "{day}")?;
    }
    out.flush()?;

    if let Some(delivery) = delivery {
        send_forecast(&forecast, &title, delivery).await?;
    }

    Ok(())
}

async fn send_forecast(forecast: &[String], title: &str, delivery: Delivery<'_>) -> Result<()> {
    info!("Sending forecast to pushover");

    for (idx, day) in forecast.iter().enumerate() {
        let message = if idx == 0 {
            Message::with_title(day.as_str(), title)
        } else {
            Message::new(day.as_str())
        };

        let receipt = delivery
            .notifier
            .send(&message, delivery.recipient)
            .await
            .with_context(|| format!("Failed to send day {} of the forecast", idx + 1))?;
        debug!(request = %receipt.request, day = idx + 1, "day delivered");
    }

    Ok(())
}
