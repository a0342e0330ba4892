use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{FetchError, FetchOutcome},
    model::{CurrentWeather, ForecastDay, SkyCondition, TemperatureUnit},
};

use super::WeatherApi;

pub const DEFAULT_FORECAST_DAYS: u32 = 3;

/// Current conditions from `current.json`.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api: WeatherApi,
}

impl WeatherClient {
    pub fn new(api: WeatherApi) -> Self {
        Self { api }
    }

    /// Always issues a fresh request. `unit` only affects which temperature
    /// the caller is expected to surface; both are returned.
    pub async fn get_current_weather(
        &self,
        query_key: &str,
        unit: TemperatureUnit,
    ) -> FetchOutcome<CurrentWeather> {
        debug!(query_key, %unit, "fetching current conditions");

        let url = self.api.current_request(query_key);
        let body = self.api.transport().get(&url).await?;

        parse_current(body)
    }
}

/// Daily forecast from `forecast.json`.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    api: WeatherApi,
}

impl ForecastClient {
    pub fn new(api: WeatherApi) -> Self {
        Self { api }
    }

    /// Days come back in provider order. The provider may return fewer than
    /// `days`; a day with a missing field fails the whole call.
    pub async fn get_forecast(
        &self,
        query_key: &str,
        unit: TemperatureUnit,
        days: u32,
    ) -> FetchOutcome<Vec<ForecastDay>> {
        debug!(query_key, %unit, days, "fetching forecast");

        let url = self.api.forecast_request(query_key, days);
        let body = self.api.transport().get(&url).await?;

        parse_forecast(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    avgtemp_f: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

/// Parse a `current.json` body; the body itself is kept as `raw_payload`.
pub fn parse_current(body: String) -> FetchOutcome<CurrentWeather> {
    let parsed: WaCurrentResponse = serde_json::from_str(&body)
        .map_err(|e| FetchError::Parse(format!("current conditions: {e}")))?;

    let condition_text = parsed.current.condition.text;

    Ok(CurrentWeather {
        location_name: parsed.location.name,
        temperature_celsius: parsed.current.temp_c,
        temperature_fahrenheit: parsed.current.temp_f,
        sky_condition: SkyCondition::classify(&condition_text),
        condition_text,
        observed_local_time: parsed.location.localtime,
        raw_payload: body,
    })
}

pub fn parse_forecast(body: &str) -> FetchOutcome<Vec<ForecastDay>> {
    let parsed: WaForecastResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("forecast: {e}")))?;

    Ok(parsed
        .forecast
        .forecastday
        .into_iter()
        .map(|d| ForecastDay {
            date: d.date,
            condition_text: d.day.condition.text,
            temperature_celsius: d.day.avgtemp_c,
            temperature_fahrenheit: d.day.avgtemp_f,
        })
        .collect())
}
