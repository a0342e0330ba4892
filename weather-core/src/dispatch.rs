//! Fire-and-report task dispatch for user-triggered fetches.
//!
//! Each request runs as its own tokio task and reports back over a channel,
//! tagged with the [`RequestId`] handed out when it was issued. Completions
//! arrive in whatever order the network delivers them; the receiver owns the
//! resulting state and correlates by id.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    error::FetchOutcome,
    model::{CurrentWeather, ForecastDay, TemperatureUnit},
    provider::{ForecastClient, WeatherClient},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub enum FetchResult {
    Current(FetchOutcome<CurrentWeather>),
    Forecast(FetchOutcome<Vec<ForecastDay>>),
}

/// A finished request.
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub unit: TemperatureUnit,
    pub result: FetchResult,
}

#[derive(Debug)]
pub struct Dispatcher {
    weather: WeatherClient,
    forecast: ForecastClient,
    tx: mpsc::UnboundedSender<Completion>,
    next_id: AtomicU64,
}

impl Dispatcher {
    /// Must be called within a tokio runtime; requests are spawned onto it.
    pub fn new(
        weather: WeatherClient,
        forecast: ForecastClient,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self { weather, forecast, tx, next_id: AtomicU64::new(1) };
        (dispatcher, rx)
    }

    fn issue_id(&self) -> RequestId {
        RequestId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn request_current(&self, query_key: &str, unit: TemperatureUnit) -> RequestId {
        let id = self.issue_id();
        let client = self.weather.clone();
        let tx = self.tx.clone();
        let query_key = query_key.to_string();

        tokio::spawn(async move {
            let result = FetchResult::Current(client.get_current_weather(&query_key, unit).await);
            send(&tx, Completion { id, unit, result });
        });

        id
    }

    pub fn request_forecast(&self, query_key: &str, unit: TemperatureUnit, days: u32) -> RequestId {
        let id = self.issue_id();
        let client = self.forecast.clone();
        let tx = self.tx.clone();
        let query_key = query_key.to_string();

        tokio::spawn(async move {
            let result = FetchResult::Forecast(client.get_forecast(&query_key, unit, days).await);
            send(&tx, Completion { id, unit, result });
        });

        id
    }
}

// A dropped receiver means nobody wants the result any more.
fn send(tx: &mpsc::UnboundedSender<Completion>, completion: Completion) {
    let id = completion.id;
    if tx.send(completion).is_err() {
        debug!(%id, "receiver gone, discarding result");
    }
}
