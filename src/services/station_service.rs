use std::sync::Arc;

use tracing::{debug, instrument};

use crate::db::{
    build_date_session_filter, BulletinStore, DbError, FeatureCollection, PointGeometry,
    Session, StationFeature, StationProperties, StationReadingRow,
};

#[derive(Clone)]
pub struct StationService {
    store: Arc<dyn BulletinStore>,
}

impl StationService {
    pub fn new(store: Arc<dyn BulletinStore>) -> Self {
        Self { store }
    }

    /// Station readings for a date/session as a GeoJSON feature collection.
    ///
    /// Without both a date and a session every located reading is returned.
    #[instrument(skip(self))]
    pub async fn get_feature_collection(
        &self,
        date: Option<&str>,
        session: Option<&str>,
    ) -> Result<FeatureCollection, DbError> {
        let filter = build_date_session_filter(date, session);
        let session = Session::from_label(session);

        let mut rows = self.store.station_readings(&filter, session).await?;
        debug!("Shaping {} station rows into features", rows.len());

        // Stable, so duplicate (river, station) pairs keep the store's order
        rows.sort_by(|a, b| (&a.river, &a.station).cmp(&(&b.river, &b.station)));

        let features = rows
            .into_iter()
            .map(|row| Self::to_feature(row, session))
            .collect();

        Ok(FeatureCollection::new(features))
    }

    fn to_feature(row: StationReadingRow, session: Session) -> StationFeature {
        StationFeature::new(
            PointGeometry::new(row.longitude, row.latitude),
            StationProperties {
                river: row.river,
                station: row.station,
                district: row.district,
                warning_level: row.warning_level_m,
                danger_level: row.danger_level_m,
                hfl_m: row.hfl_m,
                water_level_m: row.water_level_m,
                trend: row.trend,
                unique_id: row.unique_id,
                source_file: row.source_file,
                session: session.as_str().to_string(),
                time_label: session.time_label().to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(water_level_m: Option<f64>) -> StationReadingRow {
        StationReadingRow {
            longitude: 91.75,
            latitude: 26.18,
            river: "Brahmaputra".to_string(),
            station: "Guwahati".to_string(),
            district: Some("Kamrup Metro".to_string()),
            warning_level_m: Some(48.68),
            danger_level_m: Some(49.68),
            hfl_m: Some(51.46),
            water_level_m,
            trend: Some("Rising".to_string()),
            unique_id: Some("3_05.07.2024_Evening".to_string()),
            source_file: Some("05.07.2024_Evening.pdf".to_string()),
        }
    }

    #[test]
    fn test_to_feature_evening() {
        let feature = StationService::to_feature(row(Some(47.2)), Session::Evening);
        assert_eq!(feature.kind, "Feature");
        assert_eq!(feature.geometry.coordinates, [91.75, 26.18]);
        assert_eq!(feature.properties.water_level_m, Some(47.2));
        assert_eq!(feature.properties.session, "Evening");
        assert_eq!(feature.properties.time_label, "18:00");
        assert_eq!(feature.properties.warning_level, Some(48.68));
    }

    #[test]
    fn test_to_feature_keeps_null_level() {
        let feature = StationService::to_feature(row(None), Session::Morning);
        assert_eq!(feature.properties.water_level_m, None);
        assert_eq!(feature.properties.session, "Morning");
        assert_eq!(feature.properties.time_label, "08:00");

        let json = serde_json::to_value(&feature).unwrap();
        assert!(json["properties"]["water_level_m"].is_null());
        assert_eq!(json["geometry"]["type"], "Point");
    }
}
