use std::fmt::Write;

use weather_core::{CurrentWeather, FetchOutcome, ForecastDay, Location, TemperatureUnit};

pub fn location_header(location: &Location) -> String {
    format!("== {} ==", location.display_name())
}

pub fn location_details(location: &Location) -> String {
    if location.is_empty() {
        return "Location could not be detected.".to_string();
    }
    format!(
        "City: {}\nRegion: {}\nCountry: {}\nQuery: {}",
        location.city, location.region, location.country, location.query_key
    )
}

pub fn undetected_location() -> String {
    "Could not detect your location.\n\
     Hint: pass one explicitly, e.g. `weather show \"Paris, FR\"`."
        .to_string()
}

pub fn current(outcome: &FetchOutcome<CurrentWeather>, unit: TemperatureUnit, raw: bool) -> String {
    let w = match outcome {
        Ok(w) => w,
        Err(err) => return format!("Current weather unavailable. {err}"),
    };

    let mut out = format!(
        "Location: {}\nLocal time: {}\nTemperature: {}{} ({}{})\nCondition: {} [{}]",
        w.location_name,
        w.observed_local_time,
        w.temperature(unit),
        unit.symbol(),
        w.temperature(unit.toggle()),
        unit.toggle().symbol(),
        w.condition_text,
        w.sky_condition.asset(),
    );
    if raw {
        let _ = write!(out, "\nJSON: {}", w.raw_payload);
    }
    out
}

pub fn forecast(outcome: &FetchOutcome<Vec<ForecastDay>>, unit: TemperatureUnit) -> String {
    let days = match outcome {
        Ok(days) => days,
        Err(err) => return format!("Forecast unavailable. {err}"),
    };

    if days.is_empty() {
        return "Forecast: no days returned.".to_string();
    }

    let mut out = String::from("Forecast:");
    for day in days {
        let label = day
            .date_naive()
            .map(|d| d.format("%a %d %b").to_string())
            .unwrap_or_else(|| day.date.clone());
        let _ = write!(
            out,
            "\n  {label}: {}{} {}",
            day.temperature(unit),
            unit.symbol(),
            day.condition_text
        );
    }
    out
}

pub fn favorites(list: &[String]) -> String {
    if list.is_empty() {
        return "No favorite locations saved.".to_string();
    }
    list.iter().map(|l| format!("* {l}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{FetchError, SkyCondition};

    fn reading() -> CurrentWeather {
        CurrentWeather {
            location_name: "Paris".into(),
            temperature_celsius: 21.5,
            temperature_fahrenheit: 70.7,
            condition_text: "Partly cloudy".into(),
            sky_condition: SkyCondition::Cloudy,
            observed_local_time: "2024-05-01 14:30".into(),
            raw_payload: "{\"raw\":true}".into(),
        }
    }

    #[test]
    fn current_uses_selected_unit() {
        let text = current(&Ok(reading()), TemperatureUnit::Fahrenheit, false);
        assert!(text.contains("Temperature: 70.7°F (21.5°C)"));
        assert!(text.contains("cloud.jpg"));
        assert!(!text.contains("JSON:"));
    }

    #[test]
    fn current_raw_appends_payload() {
        let text = current(&Ok(reading()), TemperatureUnit::Celsius, true);
        assert!(text.contains("Temperature: 21.5°C (70.7°F)"));
        assert!(text.ends_with("JSON: {\"raw\":true}"));
    }

    #[test]
    fn failures_render_their_message() {
        let text = current(&Err(FetchError::EmptyBody), TemperatureUnit::Celsius, false);
        assert!(text.contains("no response body"));

        let text = forecast(&Err(FetchError::timeout()), TemperatureUnit::Celsius);
        assert!(text.contains("timeout"));
    }

    #[test]
    fn forecast_lists_days_in_order() {
        let days = vec![
            ForecastDay {
                date: "2024-05-01".into(),
                condition_text: "Sunny".into(),
                temperature_celsius: 18.3,
                temperature_fahrenheit: 64.9,
            },
            ForecastDay {
                date: "not-a-date".into(),
                condition_text: "Rain".into(),
                temperature_celsius: 12.0,
                temperature_fahrenheit: 53.6,
            },
        ];

        let text = forecast(&Ok(days), TemperatureUnit::Celsius);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1], "  Wed 01 May: 18.3°C Sunny");
        assert_eq!(lines[2], "  not-a-date: 12°C Rain");
    }

    #[test]
    fn favorites_listing() {
        assert_eq!(favorites(&[]), "No favorite locations saved.");
        assert_eq!(
            favorites(&["Paris, FR".to_string(), "Tokyo, JP".to_string()]),
            "* Paris, FR\n* Tokyo, JP"
        );
    }

    #[test]
    fn empty_location_details() {
        assert_eq!(location_details(&Location::default()), "Location could not be detected.");
        assert_eq!(location_header(&Location::from_query("Oslo")), "== Oslo ==");
    }
}
