use reqwest::StatusCode;
use thiserror::Error;

use crate::models::appointment::Appointment;

/// The demo feed the original scheduler page loads from.
pub const DEFAULT_FEED_URL: &str =
    "https://js.syncfusion.com/demos/ejservices/api/Schedule/LoadData";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("appointment feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("appointment feed returned status {0}")]
    Status(StatusCode),
    #[error("failed to decode appointment feed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetches the complete appointment set in one GET. No retry and no
/// timeout beyond the transport default; the caller decides what a
/// failure means for the display.
pub async fn fetch_appointments(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Appointment>, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        tracing::warn!(%status, "appointment feed returned non-success status");
        return Err(FetchError::Status(status));
    }

    let appointments: Vec<Appointment> = serde_json::from_str(&text)?;
    tracing::debug!(count = appointments.len(), "appointment feed decoded");
    Ok(appointments)
}
