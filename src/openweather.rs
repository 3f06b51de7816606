use std::error::Error;
use std::fmt;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::weather::{Coordinates, CurrentConditions, ForecastSample};

pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// What to look up: a free-text place ("Stockholm" or "Stockholm, Sweden")
/// or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl Query {
    /// Coordinates win, but only when both halves are present.
    pub fn from_parts(city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(latitude), Some(longitude)) => Some(Self::Coordinates(Coordinates {
                latitude,
                longitude,
            })),
            _ => city
                .map(str::trim)
                .filter(|city| !city.is_empty())
                .map(|city| Self::City(city.to_string())),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(city) => vec![("q", city.clone())],
            Self::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(city) => write!(f, "'{city}'"),
            Self::Coordinates(c) => write!(f, "({}, {})", c.latitude, c.longitude),
        }
    }
}

/// Outcome of one provider call. Only `Found` carries data.
#[derive(Debug, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Unavailable,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
            Self::Unavailable => Lookup::Unavailable,
        }
    }
}

pub trait WeatherSource {
    fn current(&self, query: &Query) -> Lookup<CurrentConditions>;
    fn forecast(&self, query: &Query) -> Lookup<Vec<ForecastSample>>;
}

pub mod current {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Current {
        pub name: Option<String>,

        pub timezone: Option<i32>,

        pub sys: Option<Sys>,

        pub main: Option<Main>,

        #[serde(default)]
        pub weather: Vec<Tag>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Sys {
        pub sunrise: Option<i64>,
        pub sunset: Option<i64>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp: Option<f64>,
        pub feels_like: Option<f64>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Tag {
        pub main: Option<String>,
        pub description: Option<String>,
    }

    impl From<Current> for CurrentConditions {
        fn from(current: Current) -> Self {
            let (sunrise, sunset) = current
                .sys
                .map_or((None, None), |sys| (sys.sunrise, sys.sunset));
            let (temp, feels_like) = current
                .main
                .map_or((None, None), |main| (main.temp, main.feels_like));
            let (category, description) = current
                .weather
                .into_iter()
                .next()
                .map_or((None, None), |tag| (tag.main, tag.description));
            Self {
                name: current.name,
                timezone: current.timezone,
                sunrise,
                sunset,
                temp,
                feels_like,
                category,
                description,
            }
        }
    }
}

pub mod forecast {
    use super::*;

    #[derive(Deserialize, Debug, Default)]
    pub struct Forecast {
        #[serde(default)]
        pub list: Vec<Entry>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Entry {
        pub dt: Option<i64>,

        pub dt_txt: Option<String>,

        pub main: Option<Main>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp_max: Option<f64>,
        pub temp_min: Option<f64>,
    }

    impl Forecast {
        pub fn into_samples(self) -> Vec<ForecastSample> {
            self.list
                .into_iter()
                .filter_map(|entry| {
                    let (temp_max, temp_min) = entry
                        .main
                        .map_or((None, None), |main| (main.temp_max, main.temp_min));
                    let (Some(dt), Some(dt_txt), Some(temp_max), Some(temp_min)) =
                        (entry.dt, entry.dt_txt.as_deref(), temp_max, temp_min)
                    else {
                        log::warn!(
                            "skipping incomplete forecast entry at {}",
                            entry.dt_txt.as_deref().unwrap_or("unknown time")
                        );
                        return None;
                    };
                    let date_key = dt_txt.split(' ').next().unwrap_or_default().to_string();
                    Some(ForecastSample {
                        timestamp: dt,
                        date_key,
                        temp_max,
                        temp_min,
                    })
                })
                .collect()
        }
    }
}

pub struct OpenWeather {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeather {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent("wxdash").build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn lookup<T: DeserializeOwned>(&self, endpoint: &str, query: &Query) -> Lookup<T> {
        match self.fetch(endpoint, query) {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => {
                log::info!("{endpoint}: no place matches {query}");
                Lookup::NotFound
            }
            Err(err) => {
                log::error!("{endpoint} for {query}: {}", describe(&err));
                Lookup::Unavailable
            }
        }
    }

    /// `Ok(None)` is the provider's 404.
    fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Query,
    ) -> Result<Option<T>, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let mut params = query.params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|source| ProviderError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status { url, status });
        }

        let body = response.text().map_err(|source| ProviderError::Network {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| ProviderError::Document { url, source })
    }
}

impl WeatherSource for OpenWeather {
    fn current(&self, query: &Query) -> Lookup<CurrentConditions> {
        self.lookup::<current::Current>("weather", query)
            .map(CurrentConditions::from)
    }

    fn forecast(&self, query: &Query) -> Lookup<Vec<ForecastSample>> {
        self.lookup::<forecast::Forecast>("forecast", query)
            .map(forecast::Forecast::into_samples)
    }
}

fn describe(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "test-key";

    // the blocking client must not run on the async test runtime
    async fn off_runtime<T, F>(f: F) -> T
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(f).await.unwrap()
    }

    fn stockholm() -> Query {
        Query::City("stockholm".to_string())
    }

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Stockholm",
            "timezone": 7200,
            "sys": { "sunrise": 1717207800, "sunset": 1717272000 },
            "main": { "temp": 18.4, "feels_like": 17.9 },
            "weather": [{ "main": "Clouds", "description": "broken clouds" }]
        })
    }

    #[test]
    fn test_query_prefers_coordinates() {
        assert_eq!(
            Query::from_parts(Some("Oslo"), Some(59.9), Some(10.7)),
            Some(Query::Coordinates(Coordinates {
                latitude: 59.9,
                longitude: 10.7
            }))
        );
        assert_eq!(
            Query::from_parts(Some(" Oslo "), Some(59.9), None),
            Some(Query::City("Oslo".to_string()))
        );
        assert_eq!(Query::from_parts(None, None, Some(10.7)), None);
        assert_eq!(Query::from_parts(Some("   "), None, None), None);
    }

    #[test]
    fn test_forecast_samples_from_entries() {
        let forecast: forecast::Forecast = serde_json::from_value(serde_json::json!({
            "list": [
                { "dt": 1717200000, "dt_txt": "2024-06-01 00:00:00",
                  "main": { "temp_max": 12.5, "temp_min": 11.0 } },
                { "dt": 1717210800, "main": { "temp_max": 13.0, "temp_min": 12.0 } },
                { "dt": 1717221600, "dt_txt": "2024-06-01 06:00:00" },
                { "dt": 1717232400, "dt_txt": "2024-06-01 09:00:00",
                  "main": { "temp_min": 1.0 } },
                { "dt_txt": "2024-06-01 12:00:00",
                  "main": { "temp_max": 20.0, "temp_min": 15.0 } },
                { "dt": 1717286400, "dt_txt": "2024-06-02 00:00:00",
                  "main": { "temp_max": 9.0, "temp_min": 8.5 } }
            ]
        }))
        .unwrap();
        let samples = forecast.into_samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].date_key, "2024-06-01");
        assert_eq!(samples[0].timestamp, 1717200000);
        assert_eq!(samples[1].date_key, "2024-06-02");
        assert_eq!(samples[1].temp_min, 8.5);
    }

    #[tokio::test]
    async fn test_current_by_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "stockholm"))
            .and(query_param("appid", KEY))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let lookup = off_runtime(move || {
            OpenWeather::new(&uri, KEY).unwrap().current(&stockholm())
        })
        .await;

        let current = lookup.found().unwrap();
        assert_eq!(current.name.as_deref(), Some("Stockholm"));
        assert_eq!(current.timezone, Some(7200));
        assert_eq!(current.sunrise, Some(1717207800));
        assert_eq!(current.temp, Some(18.4));
        assert_eq!(current.feels_like, Some(17.9));
        assert_eq!(current.category.as_deref(), Some("Clouds"));
        assert_eq!(current.description.as_deref(), Some("broken clouds"));
    }

    #[tokio::test]
    async fn test_forecast_by_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "59.33"))
            .and(query_param("lon", "18.07"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cod": "200",
                "list": [
                    { "dt": 1717200000, "dt_txt": "2024-06-01 00:00:00",
                      "main": { "temp_max": 12.5, "temp_min": 11.0 } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let query = Query::Coordinates(Coordinates {
            latitude: 59.33,
            longitude: 18.07,
        });
        let lookup = off_runtime(move || OpenWeather::new(&uri, KEY).unwrap().forecast(&query))
            .await;

        assert_eq!(
            lookup,
            Lookup::Found(vec![ForecastSample {
                timestamp: 1717200000,
                date_key: "2024-06-01".to_string(),
                temp_max: 12.5,
                temp_min: 11.0,
            }])
        );
    }

    #[tokio::test]
    async fn test_not_found_is_its_own_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let (current, forecast) = off_runtime(move || {
            let provider = OpenWeather::new(&uri, KEY).unwrap();
            let query = Query::City("Atlantis".to_string());
            (provider.current(&query), provider.forecast(&query))
        })
        .await;

        assert!(current.is_not_found());
        assert!(forecast.is_not_found());
    }

    #[tokio::test]
    async fn test_server_error_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let uri = server.uri();
        let lookup = off_runtime(move || {
            OpenWeather::new(&uri, KEY).unwrap().current(&stockholm())
        })
        .await;

        assert_eq!(lookup, Lookup::Unavailable);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let uri = server.uri();
        let lookup = off_runtime(move || {
            OpenWeather::new(&uri, KEY).unwrap().forecast(&stockholm())
        })
        .await;

        assert_eq!(lookup, Lookup::Unavailable);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_the_other_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": []
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let (current, forecast) = off_runtime(move || {
            let provider = OpenWeather::new(&uri, KEY).unwrap();
            (provider.current(&stockholm()), provider.forecast(&stockholm()))
        })
        .await;

        assert_eq!(current, Lookup::Unavailable);
        assert_eq!(forecast, Lookup::Found(vec![]));
    }

    #[tokio::test]
    async fn test_sparse_current_body_still_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Nowhere"
            })))
            .mount(&server)
            .await;

        let uri = server.uri();
        let lookup = off_runtime(move || {
            OpenWeather::new(&uri, KEY).unwrap().current(&stockholm())
        })
        .await;

        assert_eq!(
            lookup,
            Lookup::Found(CurrentConditions {
                name: Some("Nowhere".to_string()),
                ..Default::default()
            })
        );
    }
}
