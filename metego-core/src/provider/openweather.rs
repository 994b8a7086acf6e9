use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::{
    error::{MetegoError, Result},
    http::truncate_body,
    model::{ForecastEntry, ForecastRequest},
};

use super::ForecastProvider;

const PROVIDER: &str = "OpenWeather";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client for the OpenWeather 5 day / 3 hour forecast API.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>, http: Client) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(MetegoError::EmptyToken { provider: PROVIDER });
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{FORECAST_PATH}", self.base_url)
    }
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_entries(&self, request: &ForecastRequest) -> Result<Vec<ForecastEntry>> {
        let url = self.endpoint();
        debug!(%url, city = request.city(), "requesting forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", request.city()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| MetegoError::Transport { provider: PROVIDER, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| MetegoError::Transport { provider: PROVIDER, source })?;

        if !status.is_success() {
            return Err(MetegoError::Status {
                provider: PROVIDER,
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|source| MetegoError::Decode { provider: PROVIDER, source })?;

        debug!(entries = parsed.list.len(), "forecast received");

        Ok(parsed.list.into_iter().map(ForecastEntry::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    #[serde(deserialize_with = "deserialize_dt_txt")]
    dt_txt: NaiveDateTime,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        Self {
            timestamp: entry.dt_txt,
            humidity: entry.main.humidity,
            temperature: entry.main.temp,
            descriptions: entry.weather.into_iter().map(|w| w.description).collect(),
        }
    }
}

fn deserialize_dt_txt<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, DT_TXT_FORMAT).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"{
        "cod": "200",
        "cnt": 3,
        "list": [
            {"dt": 1714586400, "dt_txt": "2024-05-01 18:00:00",
             "main": {"temp": 20.0, "feels_like": 19.4, "humidity": 60},
             "weather": [{"id": 801, "main": "Clouds", "description": "few clouds"}]},
            {"dt": 1714597200, "dt_txt": "2024-05-01 21:00:00",
             "main": {"temp": 17.5, "feels_like": 17.0, "humidity": 65},
             "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}]},
            {"dt": 1714608000, "dt_txt": "2024-05-02 00:00:00",
             "main": {"temp": 14.0, "feels_like": 13.1, "humidity": 70},
             "weather": [{"id": 500, "main": "Rain", "description": "light rain"},
                         {"id": 701, "main": "Mist", "description": "mist"}]}
        ],
        "city": {"name": "Paris", "country": "FR"}
    }"#;

    fn query_for(city: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), city.into()),
            Matcher::UrlEncoded("units".into(), "metric".into()),
            Matcher::UrlEncoded("appid".into(), "KEY".into()),
        ])
    }

    fn provider(server: &Server) -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY", Client::new())
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = OpenWeatherProvider::new("", Client::new()).unwrap_err();
        assert!(matches!(err, MetegoError::EmptyToken { provider: "OpenWeather" }));
    }

    #[test]
    fn debug_hides_api_key() {
        let p = OpenWeatherProvider::new("SECRET", Client::new()).unwrap();
        assert!(!format!("{p:?}").contains("SECRET"));
    }

    #[tokio::test]
    async fn fetch_entries_decodes_the_list() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", FORECAST_PATH)
            .match_query(query_for("Paris"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let request = ForecastRequest::new("Paris", 1).unwrap();
        let entries = provider(&server).fetch_entries(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].timestamp.to_string(), "2024-05-01 18:00:00");
        assert_eq!(entries[0].humidity, 60.0);
        assert_eq!(entries[1].temperature, 17.5);
        assert_eq!(entries[2].descriptions, vec!["light rain", "mist"]);
    }

    #[tokio::test]
    async fn forecast_formats_requested_days() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", FORECAST_PATH)
            .match_query(query_for("Paris"))
            .with_status(200)
            .with_body(BODY)
            .create_async()
            .await;

        let request = ForecastRequest::new("Paris", 1).unwrap();
        let forecast = provider(&server).forecast(&request).await.unwrap();

        assert_eq!(
            forecast,
            vec![
                "2024-05-01\n18:00:00 | few clouds - h:60% - 20.00°C\n21:00:00 | clear sky - h:65% - 17.50°C\n"
            ]
        );
    }

    #[tokio::test]
    async fn city_with_spaces_is_url_encoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", FORECAST_PATH)
            .match_query(query_for("Saint Malo"))
            .with_status(200)
            .with_body(r#"{"list": []}"#)
            .create_async()
            .await;

        let request = ForecastRequest::new("Saint Malo", 1).unwrap();
        let entries = provider(&server).fetch_entries(&request).await.unwrap();

        mock.assert_async().await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", FORECAST_PATH)
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"cod":"404","message":"city not found"}"#)
            .create_async()
            .await;

        let request = ForecastRequest::new("Atlantis", 1).unwrap();
        let err = provider(&server).forecast(&request).await.unwrap_err();

        match err {
            MetegoError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("city not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", FORECAST_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"list\": [")
            .create_async()
            .await;

        let request = ForecastRequest::new("Paris", 1).unwrap();
        let err = provider(&server).forecast(&request).await.unwrap_err();

        assert!(matches!(err, MetegoError::Decode { .. }));
    }

    #[tokio::test]
    async fn malformed_timestamp_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", FORECAST_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"list": [{"dt_txt": "tomorrow", "main": {"temp": 1.0, "humidity": 2}, "weather": []}]}"#,
            )
            .create_async()
            .await;

        let request = ForecastRequest::new("Paris", 1).unwrap();
        let err = provider(&server).fetch_entries(&request).await.unwrap_err();

        assert!(matches!(err, MetegoError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let p = OpenWeatherProvider::new("KEY", Client::new())
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let request = ForecastRequest::new("Paris", 1).unwrap();

        let err = p.fetch_entries(&request).await.unwrap_err();

        assert!(matches!(err, MetegoError::Transport { .. }));
    }
}
