use async_trait::async_trait;

use crate::clients::web_api_client::{self, FetchError};
use crate::models::appointment::Appointment;

#[async_trait]
pub trait AppointmentSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Appointment>, FetchError>;
}

pub struct WebApiSource {
    client: reqwest::Client,
    url: String,
}

impl WebApiSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl AppointmentSource for WebApiSource {
    async fn fetch_all(&self) -> Result<Vec<Appointment>, FetchError> {
        web_api_client::fetch_appointments(&self.client, &self.url).await
    }
}
