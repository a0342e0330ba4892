use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use tracing::debug;
use weather_core::{
    ApiKey, Config, Dispatcher, FetchResult, Location, LocationResolver, TemperatureUnit,
    clients_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and short forecasts")]
pub struct Cli {
    /// Log request details to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions and a short forecast.
    Show {
        /// City, "city,country" or IP address. Detected from your IP if absent.
        query: Option<String>,

        /// Temperature unit to display: c or f.
        #[arg(short, long, default_value = "c")]
        unit: TemperatureUnit,

        /// Number of forecast days to request.
        #[arg(long)]
        days: Option<u32>,

        /// Also print the raw provider payload.
        #[arg(long)]
        raw: bool,
    },

    /// Print the location detected from your IP address.
    Locate,

    /// Save the weatherapi.com API key.
    Configure {
        /// The key; prompted for if omitted.
        key: Option<String>,
    },

    /// Manage favorite locations.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List saved locations.
    List,
    /// Save a location.
    Add { location: String },
    /// Forget a location.
    Remove { location: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Show { query, unit, days, raw } => {
                let days = days.unwrap_or(config.forecast_days);
                show(&config, query, unit, days, raw).await
            }
            Command::Locate => locate(&config).await,
            Command::Configure { key } => configure(&config, key),
            Command::Favorites { action } => favorites(&config, action),
        }
    }
}

async fn show(
    config: &Config,
    query: Option<String>,
    unit: TemperatureUnit,
    days: u32,
    raw: bool,
) -> anyhow::Result<()> {
    let store = config.credential_store()?;
    let api_key = ApiKey::new(store.resolve()?.unwrap_or_default());
    let clients = clients_from_config(config, api_key.clone())?;

    if !api_key.is_set() {
        let key = prompt_key().map_err(|_| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` and enter your weatherapi.com key."
            )
        })?;
        store.save_and_publish(&key, &api_key)?;
    }

    let Some(location) = choose_location(query, &clients.location).await else {
        println!("{}", render::undetected_location());
        return Ok(());
    };

    println!("{}", render::location_header(&location));

    let (dispatcher, mut rx) = Dispatcher::new(clients.weather, clients.forecast);
    let mut pending = HashSet::from([
        dispatcher.request_current(&location.query_key, unit),
        dispatcher.request_forecast(&location.query_key, unit, days),
    ]);
    drop(dispatcher);

    while let Some(done) = rx.recv().await {
        if !pending.remove(&done.id) {
            debug!(id = %done.id, "ignoring result for unknown request");
            continue;
        }
        debug!(id = %done.id, "request completed");

        let text = match &done.result {
            FetchResult::Current(outcome) => render::current(outcome, done.unit, raw),
            FetchResult::Forecast(outcome) => render::forecast(outcome, done.unit),
        };
        println!("{text}");
    }

    Ok(())
}

/// The typed query if any, otherwise the IP-detected location when it has a
/// usable query key.
async fn choose_location(query: Option<String>, resolver: &LocationResolver) -> Option<Location> {
    if let Some(q) = query {
        return Some(Location::from_query(q));
    }
    let detected = resolver.resolve_current_location().await;
    (!detected.query_key.is_empty()).then_some(detected)
}

fn prompt_key() -> anyhow::Result<String> {
    let key = inquire::Password::new("weatherapi.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty.");
    }
    Ok(key.to_string())
}

async fn locate(config: &Config) -> anyhow::Result<()> {
    let clients = clients_from_config(config, ApiKey::default())?;
    let location = clients.location.resolve_current_location().await;
    println!("{}", render::location_details(&location));
    Ok(())
}

fn configure(config: &Config, key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(k) if !k.trim().is_empty() => k.trim().to_string(),
        Some(_) => bail!("API key must not be empty."),
        None => prompt_key()?,
    };

    let store = config.credential_store()?;
    store.save(&key)?;
    println!("Saved API key to {}", store.path().display());
    Ok(())
}

fn favorites(config: &Config, action: FavoritesAction) -> anyhow::Result<()> {
    let store = config.favorites_store()?;

    let list = match action {
        FavoritesAction::List => store.load()?,
        FavoritesAction::Add { location } => store.add(&location)?,
        FavoritesAction::Remove { location } => store.remove(&location)?,
    };

    println!("{}", render::favorites(&list));
    Ok(())
}
