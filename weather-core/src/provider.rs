use anyhow::Context;
use reqwest::Url;
use std::sync::Arc;

use crate::{
    Config,
    credentials::ApiKey,
    gateway::{HttpGateway, Transport},
};

pub mod ipapi;
pub mod weatherapi;

pub use ipapi::LocationResolver;
pub use weatherapi::{ForecastClient, WeatherClient};

/// weatherapi.com endpoints plus the transport and key used to call them.
#[derive(Debug, Clone)]
pub struct WeatherApi {
    transport: Arc<dyn Transport>,
    current_url: Url,
    forecast_url: Url,
    api_key: ApiKey,
}

impl WeatherApi {
    /// `base_url` must end with a slash, e.g. `https://api.weatherapi.com/v1/`.
    pub fn new(transport: Arc<dyn Transport>, base_url: &Url, api_key: ApiKey) -> anyhow::Result<Self> {
        let current_url = base_url
            .join("current.json")
            .with_context(|| format!("Cannot build current.json URL from {base_url}"))?;
        let forecast_url = base_url
            .join("forecast.json")
            .with_context(|| format!("Cannot build forecast.json URL from {base_url}"))?;

        Ok(Self { transport, current_url, forecast_url, api_key })
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn current_request(&self, query_key: &str) -> Url {
        self.request(&self.current_url, query_key, &[])
    }

    pub(crate) fn forecast_request(&self, query_key: &str, days: u32) -> Url {
        let days = days.to_string();
        self.request(&self.forecast_url, query_key, &[("days", days.as_str())])
    }

    // The key is read here, per request, so a replaced key takes effect immediately.
    fn request(&self, endpoint: &Url, query_key: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", query_key);
            query.append_pair("key", &self.api_key.get());
            for (name, value) in extra {
                query.append_pair(name, value);
            }
        }
        url
    }
}

/// Every network-facing component, wired to one shared gateway.
#[derive(Debug, Clone)]
pub struct Clients {
    pub weather: WeatherClient,
    pub forecast: ForecastClient,
    pub location: LocationResolver,
}

/// Build the clients described by `config`, sharing `api_key` between them.
pub fn clients_from_config(config: &Config, api_key: ApiKey) -> anyhow::Result<Clients> {
    let transport: Arc<dyn Transport> = Arc::new(HttpGateway::new(config.timeout()));
    clients_with_transport(config, api_key, transport)
}

pub fn clients_with_transport(
    config: &Config,
    api_key: ApiKey,
    transport: Arc<dyn Transport>,
) -> anyhow::Result<Clients> {
    let api = WeatherApi::new(transport.clone(), &config.weather_base_url()?, api_key)?;
    let location = LocationResolver::new(transport, &config.geolocation_base_url()?)?;

    Ok(Clients {
        weather: WeatherClient::new(api.clone()),
        forecast: ForecastClient::new(api),
        location,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::Url;

    use crate::{error::FetchOutcome, gateway::Transport};

    /// Deterministic transport: answers every call with the same outcome and
    /// records what was asked.
    #[derive(Debug)]
    pub struct MockTransport {
        outcome: FetchOutcome<String>,
        requests: Mutex<Vec<Url>>,
    }

    impl MockTransport {
        pub fn new(outcome: FetchOutcome<String>) -> Self {
            Self { outcome, requests: Mutex::new(Vec::new()) }
        }

        pub fn ok(body: &str) -> Self {
            Self::new(Ok(body.to_string()))
        }

        pub fn requests(&self) -> Vec<Url> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: &Url) -> FetchOutcome<String> {
            self.requests.lock().push(url.clone());
            self.outcome.clone()
        }
    }
}
