//! Best-effort starting location from ip-api.com.

use anyhow::Context;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::{FetchError, FetchOutcome},
    gateway::Transport,
    model::Location,
};

const FIELDS: &str = "fields=city,query,regionName,country";

#[derive(Debug, Clone)]
pub struct LocationResolver {
    transport: Arc<dyn Transport>,
    url: Url,
}

impl LocationResolver {
    pub fn new(transport: Arc<dyn Transport>, base_url: &Url) -> anyhow::Result<Self> {
        let mut url = base_url
            .join("json/")
            .with_context(|| format!("Cannot build geolocation URL from {base_url}"))?;
        url.set_query(Some(FIELDS));

        Ok(Self { transport, url })
    }

    /// Never fails: any transport or parse problem yields an all-empty
    /// [`Location`].
    pub async fn resolve_current_location(&self) -> Location {
        let resolved = match self.transport.get(&self.url).await {
            Ok(body) => parse_location(&body),
            Err(err) => Err(err),
        };

        match resolved {
            Ok(location) => {
                info!(city = %location.city, country = %location.country, "resolved location");
                location
            }
            Err(err) => {
                warn!(error = %err, "location lookup failed, starting without one");
                Location::default()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IpApiResponse {
    city: Option<String>,
    query: Option<String>,
    region_name: Option<String>,
    country: Option<String>,
}

/// Missing or null fields become empty strings.
fn parse_location(body: &str) -> FetchOutcome<Location> {
    let parsed: IpApiResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("geolocation: {e}")))?;

    Ok(Location {
        city: parsed.city.unwrap_or_default(),
        region: parsed.region_name.unwrap_or_default(),
        country: parsed.country.unwrap_or_default(),
        query_key: parsed.query.unwrap_or_default(),
    })
}
