use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Database row models

/// One bulletin reading joined with its station location
#[derive(Debug, Clone, FromRow)]
pub struct StationReadingRow {
    pub longitude: f64,
    pub latitude: f64,
    pub river: String,
    pub station: String,
    pub district: Option<String>,
    pub warning_level_m: Option<f64>,
    pub danger_level_m: Option<f64>,
    pub hfl_m: Option<f64>,
    /// Morning or evening level, depending on the requested session
    pub water_level_m: Option<f64>,
    pub trend: Option<String>,
    pub unique_id: Option<String>,
    pub source_file: Option<String>,
}

/// One bulletin reading for a single station's time series
#[derive(Debug, Clone, FromRow)]
pub struct HydrographRow {
    pub unique_id: Option<String>,
    pub source_file: Option<String>,
    pub forecast_date: Option<String>,
    pub warning_level_m: Option<f64>,
    pub danger_level_m: Option<f64>,
    pub hfl_m: Option<f64>,
    pub water_level_0800hrs_m: Option<f64>,
    pub water_level_1800hrs_m: Option<f64>,
}

// API response DTOs (GeoJSON shapes and hydrograph points)

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<StationFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<StationFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: StationProperties,
}

impl StationFeature {
    pub fn new(geometry: PointGeometry, properties: StationProperties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    #[schema(value_type = Vec<f64>)]
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationProperties {
    pub river: String,
    pub station: String,
    pub district: Option<String>,
    pub warning_level: Option<f64>,
    pub danger_level: Option<f64>,
    pub hfl_m: Option<f64>,
    pub water_level_m: Option<f64>,
    pub trend: Option<String>,
    pub unique_id: Option<String>,
    pub source_file: Option<String>,
    /// "Morning" or "Evening"
    pub session: String,
    /// "08:00" or "18:00"
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HydrographPoint {
    /// `YYYY-MM-DD HH:MM`
    pub datetime: String,
    pub level: f64,
    pub warning: Option<f64>,
    pub danger: Option<f64>,
    pub hfl: Option<f64>,
}
