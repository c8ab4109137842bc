use std::sync::Arc;

use tracing::{debug, instrument};

use crate::db::{BulletinStore, DbError, HydrographPoint, HydrographRow};

#[derive(Clone)]
pub struct HydrographService {
    store: Arc<dyn BulletinStore>,
}

impl HydrographService {
    pub fn new(store: Arc<dyn BulletinStore>) -> Self {
        Self { store }
    }

    /// Time series for one station, two potential points per bulletin row
    #[instrument(skip(self))]
    pub async fn get_series(&self, station: &str) -> Result<Vec<HydrographPoint>, DbError> {
        let rows = self.store.hydrograph_rows(station).await?;
        let points: Vec<HydrographPoint> = rows.iter().flat_map(Self::row_points).collect();
        debug!("Flattened {} rows into {} points", rows.len(), points.len());
        Ok(points)
    }

    /// Morning point first, then evening; null levels produce no point
    pub fn row_points(row: &HydrographRow) -> Vec<HydrographPoint> {
        [
            (row.water_level_0800hrs_m, "08:00"),
            (row.water_level_1800hrs_m, "18:00"),
        ]
        .into_iter()
        .filter_map(|(level, time)| {
            level.map(|level| HydrographPoint {
                datetime: Self::datetime_label(row.forecast_date.as_deref(), time),
                level,
                warning: row.warning_level_m,
                danger: row.danger_level_m,
                hfl: row.hfl_m,
            })
        })
        .collect()
    }

    fn datetime_label(forecast_date: Option<&str>, time: &str) -> String {
        match forecast_date {
            Some(date) if !date.is_empty() => format!("{date} {time}"),
            _ => time.to_string(),
        }
    }
}
