use crate::domain::LocationSample;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

pub const ADDRESS_LOOKUP_FAILED: &str = "Address lookup failed";
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    display_name: Option<String>,
}

/// Resolves a fix to a human-readable address via a Nominatim-style reverse
/// geocoding service. Address display is cosmetic, so every failure (network,
/// non-success status, malformed payload) degrades to a fixed placeholder
/// string instead of propagating.
#[instrument(skip_all)]
pub async fn reverse_lookup(client: &Client, base_url: impl AsRef<str>, sample: &LocationSample) -> String {
    debug!("🌍 Looking up address...");
    match try_reverse_lookup(client, base_url.as_ref(), sample).await {
        Ok(address) => {
            info!("🌍 Looking up address... OK");
            address
        }
        Err(e) => {
            warn!("🌍 Looking up address... failed, {}", e);
            ADDRESS_LOOKUP_FAILED.to_string()
        }
    }
}

async fn try_reverse_lookup(client: &Client, base_url: &str, sample: &LocationSample) -> Result<String, reqwest::Error> {
    let coordinate = sample.coordinate();
    let response = client
        .get(format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom=18&addressdetails=1",
            base_url, coordinate.latitude, coordinate.longitude
        ))
        .send()
        .await?
        .error_for_status()?;

    let payload = response.json::<ReverseGeocodeResponse>().await?;
    Ok(payload.display_name.unwrap_or_else(|| ADDRESS_NOT_FOUND.to_string()))
}
