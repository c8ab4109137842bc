//! HTTP client for the river level API plus the map and chart views built on it.

pub mod chart;
pub mod map;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::db::{FeatureCollection, HydrographPoint, Session};

pub use chart::{ChartView, LineChart, ReferenceLine};
pub use map::{MapView, Marker, MarkerLayer, Popup};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Clone)]
pub struct BulletinClient {
    client: Client,
    base_url: String,
}

impl BulletinClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/stations?date=&session=`
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_stations(
        &self,
        date: &str,
        session: Session,
    ) -> Result<FeatureCollection, ClientError> {
        let url = format!("{}/api/stations", self.base_url);
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("date", date), ("session", session.as_str())])
            .send()
            .await?;

        Self::decode(response).await
    }

    /// `GET /api/hydrograph?station=`
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_hydrograph(&self, station: &str) -> Result<Vec<HydrographPoint>, ClientError> {
        let url = format!("{}/api/hydrograph", self.base_url);
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("station", station)])
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(String::from))
                .unwrap_or(body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
