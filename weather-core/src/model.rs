use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A place the weather provider can be asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub country: String,
    /// Identifier accepted by the provider's `q` parameter.
    pub query_key: String,
}

impl Location {
    /// Location typed in by the user; only the query key is known.
    pub fn from_query(text: impl Into<String>) -> Self {
        Self { query_key: text.into(), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_empty()
            && self.region.is_empty()
            && self.country.is_empty()
            && self.query_key.is_empty()
    }

    /// "City, Country" when both are known, otherwise whatever is available.
    pub fn display_name(&self) -> String {
        match (self.city.is_empty(), self.country.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.country),
            (false, true) => self.city.clone(),
            (true, false) => self.country.clone(),
            (true, true) => self.query_key.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(format!("Unknown temperature unit '{s}'. Use 'c' or 'f'.")),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Coarse sky state used to pick a background asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyCondition {
    #[default]
    Clear,
    Cloudy,
    Rain,
}

impl SkyCondition {
    /// Case-insensitive substring match; "rain" wins over "cloud".
    pub fn classify(condition_text: &str) -> Self {
        let lower = condition_text.to_lowercase();
        if lower.contains("rain") {
            SkyCondition::Rain
        } else if lower.contains("cloud") {
            SkyCondition::Cloudy
        } else {
            SkyCondition::Clear
        }
    }

    pub fn asset(&self) -> &'static str {
        match self {
            SkyCondition::Clear => "sun.jpg",
            SkyCondition::Cloudy => "cloud.jpg",
            SkyCondition::Rain => "rain.jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
    pub condition_text: String,
    pub sky_condition: SkyCondition,
    pub observed_local_time: String,
    /// Body exactly as received, kept for diagnostics.
    pub raw_payload: String,
}

impl CurrentWeather {
    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.temperature_celsius,
            TemperatureUnit::Fahrenheit => self.temperature_fahrenheit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO 8601 date as sent by the provider.
    pub date: String,
    pub condition_text: String,
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
}

impl ForecastDay {
    pub fn temperature(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.temperature_celsius,
            TemperatureUnit::Fahrenheit => self.temperature_fahrenheit,
        }
    }

    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn sky_condition(&self) -> SkyCondition {
        SkyCondition::classify(&self.condition_text)
    }
}
