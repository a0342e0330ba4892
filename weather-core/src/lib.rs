//! Core library for the `weather` app.
//!
//! This crate defines:
//! - An HTTP gateway with a fixed failure taxonomy
//! - Clients for current conditions, daily forecast and IP geolocation
//! - Shared domain models (locations, readings, forecast days)
//! - Small file-backed stores for favorites and the provider API key
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod favorites;
pub mod gateway;
pub mod model;
pub mod provider;

pub use config::Config;
pub use credentials::{ApiKey, CredentialStore};
pub use dispatch::{Completion, Dispatcher, FetchResult, RequestId};
pub use error::{ErrorKind, FetchError, FetchOutcome};
pub use favorites::FavoritesStore;
pub use gateway::{HttpGateway, Transport};
pub use model::{CurrentWeather, ForecastDay, Location, SkyCondition, TemperatureUnit};
pub use provider::{
    Clients, ForecastClient, LocationResolver, WeatherApi, WeatherClient, clients_from_config,
    weatherapi::DEFAULT_FORECAST_DAYS,
};
