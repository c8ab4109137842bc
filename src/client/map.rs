use std::fmt;

use chrono::Utc;
use tracing::{debug, error, info, instrument};

use super::BulletinClient;
use crate::db::{FeatureCollection, Session, StationFeature};

/// Initial view over the Brahmaputra basin
pub const DEFAULT_CENTER: (f64, f64) = (92.5, 26.2);
pub const DEFAULT_ZOOM: u8 = 6;

/// Attributes shown when a marker is clicked
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub station: String,
    pub river: String,
    pub district: Option<String>,
    pub warning_level: Option<f64>,
    pub danger_level: Option<f64>,
    pub hfl_m: Option<f64>,
    pub water_level_m: Option<f64>,
    pub trend: Option<String>,
    pub time_label: String,
}

impl Popup {
    fn from_feature(feature: &StationFeature) -> Self {
        let p = &feature.properties;
        Self {
            station: p.station.clone(),
            river: p.river.clone(),
            district: p.district.clone(),
            warning_level: p.warning_level,
            danger_level: p.danger_level,
            hfl_m: p.hfl_m,
            water_level_m: p.water_level_m,
            trend: p.trend.clone(),
            time_label: p.time_label.clone(),
        }
    }
}

fn or_dash(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.station, self.river)?;
        writeln!(f, "Warning: {} m", or_dash(self.warning_level))?;
        writeln!(f, "Danger: {} m", or_dash(self.danger_level))?;
        writeln!(f, "HFL: {} m", or_dash(self.hfl_m))?;
        writeln!(f, "Water @ {}: {} m", self.time_label, or_dash(self.water_level_m))?;
        writeln!(f, "Trend: {}", self.trend.as_deref().unwrap_or("-"))?;
        write!(f, "{}", self.district.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub longitude: f64,
    pub latitude: f64,
    pub popup: Popup,
}

/// Markers currently drawn on the map
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    /// Clear then add, so a refresh never shows a mix of old and new markers
    pub fn replace(&mut self, collection: &FeatureCollection) {
        let markers = collection
            .features
            .iter()
            .map(|feature| Marker {
                longitude: feature.geometry.longitude(),
                latitude: feature.geometry.latitude(),
                popup: Popup::from_feature(feature),
            })
            .collect();
        self.markers = markers;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Nearest marker within `tolerance` degrees of the clicked position
    pub fn hit(&self, longitude: f64, latitude: f64, tolerance: f64) -> Option<&Marker> {
        self.markers
            .iter()
            .map(|m| {
                let d = (m.longitude - longitude).hypot(m.latitude - latitude);
                (m, d)
            })
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)
    }
}

/// Map state driven by a date and session selector
pub struct MapView {
    client: BulletinClient,
    date: String,
    session: Session,
    loaded: Option<(String, Session)>,
    layer: MarkerLayer,
    pub center: (f64, f64),
    pub zoom: u8,
}

impl MapView {
    /// Starts on today's (UTC) morning bulletin
    pub fn new(client: BulletinClient) -> Self {
        Self {
            client,
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            session: Session::Morning,
            loaded: None,
            layer: MarkerLayer::default(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn layer(&self) -> &MarkerLayer {
        &self.layer
    }

    /// Re-fetch if the selection changed since the last successful load.
    ///
    /// Returns `true` when markers were replaced. Fetch failures are logged and
    /// leave the current markers in place.
    #[instrument(skip(self), fields(date = %self.date, session = %self.session))]
    pub async fn refresh(&mut self) -> bool {
        let selection = (self.date.clone(), self.session);
        if self.loaded.as_ref() == Some(&selection) {
            debug!("Selection unchanged, keeping {} markers", self.layer.len());
            return false;
        }

        match self.client.fetch_stations(&self.date, self.session).await {
            Ok(collection) => {
                self.layer.replace(&collection);
                self.loaded = Some(selection);
                info!("Loaded {} station markers", self.layer.len());
                true
            }
            Err(e) => {
                error!("Failed to fetch stations: {}", e);
                false
            }
        }
    }

    pub fn click(&self, longitude: f64, latitude: f64, tolerance: f64) -> Option<&Popup> {
        self.layer.hit(longitude, latitude, tolerance).map(|m| &m.popup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{PointGeometry, StationProperties};

    fn feature(station: &str, lon: f64, lat: f64, level: Option<f64>) -> StationFeature {
        StationFeature::new(
            PointGeometry::new(lon, lat),
            StationProperties {
                river: "Brahmaputra".to_string(),
                station: station.to_string(),
                district: Some("Dibrugarh".to_string()),
                warning_level: Some(104.24),
                danger_level: Some(105.7),
                hfl_m: Some(106.48),
                water_level_m: level,
                trend: None,
                unique_id: None,
                source_file: None,
                session: "Evening".to_string(),
                time_label: "18:00".to_string(),
            },
        )
    }

    #[test]
    fn test_replace_clears_previous_markers() {
        let mut layer = MarkerLayer::default();
        layer.replace(&FeatureCollection::new(vec![
            feature("Dibrugarh", 94.9, 27.48, Some(103.1)),
            feature("Neamatighat", 94.3, 26.9, None),
        ]));
        assert_eq!(layer.len(), 2);

        layer.replace(&FeatureCollection::new(vec![feature("Tezpur", 92.8, 26.6, None)]));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.markers()[0].popup.station, "Tezpur");

        layer.replace(&FeatureCollection::new(vec![]));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_hit_picks_nearest_within_tolerance() {
        let mut layer = MarkerLayer::default();
        layer.replace(&FeatureCollection::new(vec![
            feature("A", 94.0, 27.0, None),
            feature("B", 94.2, 27.0, None),
        ]));
        assert_eq!(layer.hit(94.15, 27.0, 0.1).unwrap().popup.station, "B");
        assert!(layer.hit(90.0, 20.0, 0.1).is_none());
    }

    #[test]
    fn test_popup_rendering() {
        let popup = Popup::from_feature(&feature("Dibrugarh", 94.9, 27.48, Some(103.1)));
        let text = popup.to_string();
        assert!(text.starts_with("Dibrugarh (Brahmaputra)\n"));
        assert!(text.contains("Warning: 104.24 m"));
        assert!(text.contains("Water @ 18:00: 103.1 m"));
        assert!(text.contains("Trend: -"));
        assert!(text.ends_with("Dibrugarh"));
    }

    #[test]
    fn test_popup_missing_level_renders_dash() {
        let popup = Popup::from_feature(&feature("Neamatighat", 94.3, 26.9, None));
        assert!(popup.to_string().contains("Water @ 18:00: - m"));
    }
}
