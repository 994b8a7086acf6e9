use chrono::NaiveDate;

use crate::{
    error::{MetegoError, Result},
    model::ForecastEntry,
};

/// Group chronologically ordered entries into one summary per calendar day.
///
/// Each summary starts with a `YYYY-MM-DD` header followed by one line per
/// (sample, description) pair. Grouping stops as soon as an entry for day
/// `days + 1` shows up. When the entries run out first, the last pending
/// day is kept and the result must still cover `days` days, otherwise
/// [`MetegoError::InsufficientData`] is returned.
pub fn format_forecast(entries: &[ForecastEntry], days: u32) -> Result<Vec<String>> {
    let wanted = days as usize;
    let mut forecast = Vec::with_capacity(wanted);
    let mut current: Option<(NaiveDate, String)> = None;
    let mut dates_seen = 0usize;

    for entry in entries {
        let date = entry.timestamp.date();

        for description in &entry.descriptions {
            let line = format_line(entry, description);

            if let Some((current_date, buffer)) = current.as_mut() {
                if *current_date == date {
                    buffer.push_str(&line);
                    continue;
                }
            }

            if let Some((_, finished)) = current.take() {
                forecast.push(finished);
            }
            dates_seen += 1;
            if dates_seen > wanted {
                return Ok(forecast);
            }
            current = Some((date, format!("{}\n{line}", date.format("%Y-%m-%d"))));
        }
    }

    if let Some((_, finished)) = current {
        forecast.push(finished);
    }

    if forecast.len() < wanted {
        return Err(MetegoError::InsufficientData {
            requested: days,
            available: forecast.len(),
        });
    }

    Ok(forecast)
}

fn format_line(entry: &ForecastEntry, description: &str) -> String {
    format!(
        "{} | {} - h:{}% - {:.2}°C\n",
        entry.timestamp.format("%H:%M:%S"),
        description,
        entry.humidity,
        entry.temperature,
    )
}
