use futures::future::{BoxFuture, FutureExt};
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{
    BulletinStore, DateSessionFilter, DbError, HydrographRow, Session, StationReadingRow,
};

#[derive(Clone)]
pub struct BulletinRepository {
    pool: PgPool,
}

impl BulletinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Assemble the stations query for a session and optional date/session predicate
    pub fn station_readings_sql(filter: &DateSessionFilter, session: Session) -> String {
        let mut where_parts: Vec<&str> = Vec::new();
        if !filter.is_empty() {
            where_parts.push(&filter.clause);
        }
        where_parts.push("loc.lat IS NOT NULL AND loc.lon IS NOT NULL");

        format!(
            r#"
            SELECT
                CAST(loc.lon AS DOUBLE PRECISION) AS longitude,
                CAST(loc.lat AS DOUBLE PRECISION) AS latitude,
                wlb.river,
                wlb.station,
                wlb.district,
                CAST(wlb.warning_level_m AS DOUBLE PRECISION) AS warning_level_m,
                CAST(wlb.danger_level_m AS DOUBLE PRECISION) AS danger_level_m,
                CAST(wlb.hfl_m AS DOUBLE PRECISION) AS hfl_m,
                CAST(wlb.{column} AS DOUBLE PRECISION) AS water_level_m,
                wlb.trend,
                wlb.unique_id,
                wlb.source_file
            FROM river_levels_bulletin wlb
            JOIN cwc_location loc
                ON (wlb.river = loc.river AND wlb.station = loc.station)
            WHERE {predicate}
            ORDER BY wlb.river, wlb.station
            "#,
            column = session.water_level_column(),
            predicate = where_parts.join(" AND "),
        )
    }

    #[instrument(skip(self, filter), fields(session = %session, filtered = !filter.is_empty()))]
    pub async fn find_station_readings(
        &self,
        filter: &DateSessionFilter,
        session: Session,
    ) -> Result<Vec<StationReadingRow>, DbError> {
        let sql = Self::station_readings_sql(filter, session);
        debug!("Querying station readings with {} parameters", filter.params.len());

        let mut query = sqlx::query_as::<_, StationReadingRow>(&sql);
        for param in &filter.params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;

        debug!("Found {} station readings", rows.len());
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn find_hydrograph_rows(&self, station: &str) -> Result<Vec<HydrographRow>, DbError> {
        debug!("Querying hydrograph rows for station {}", station);

        let rows = sqlx::query_as::<_, HydrographRow>(
            r#"
            SELECT
                unique_id,
                source_file,
                CAST(forecast_date AS TEXT) AS forecast_date,
                CAST(warning_level_m AS DOUBLE PRECISION) AS warning_level_m,
                CAST(danger_level_m AS DOUBLE PRECISION) AS danger_level_m,
                CAST(hfl_m AS DOUBLE PRECISION) AS hfl_m,
                CAST(water_level_0800hrs_m AS DOUBLE PRECISION) AS water_level_0800hrs_m,
                CAST(water_level_1800hrs_m AS DOUBLE PRECISION) AS water_level_1800hrs_m
            FROM river_levels_bulletin
            WHERE station = $1
            ORDER BY forecast_date ASC, forecast_time ASC
            "#,
        )
        .bind(station)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} hydrograph rows", rows.len());
        Ok(rows)
    }
}

impl BulletinStore for BulletinRepository {
    fn station_readings<'a>(
        &'a self,
        filter: &'a DateSessionFilter,
        session: Session,
    ) -> BoxFuture<'a, Result<Vec<StationReadingRow>, DbError>> {
        self.find_station_readings(filter, session).boxed()
    }

    fn hydrograph_rows<'a>(
        &'a self,
        station: &'a str,
    ) -> BoxFuture<'a, Result<Vec<HydrographRow>, DbError>> {
        self.find_hydrograph_rows(station).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::build_date_session_filter;

    fn squash(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_station_sql_unfiltered() {
        let sql = squash(&BulletinRepository::station_readings_sql(
            &DateSessionFilter::default(),
            Session::Morning,
        ));
        assert!(sql.contains("CAST(wlb.water_level_0800hrs_m AS DOUBLE PRECISION) AS water_level_m"));
        assert!(sql.contains("WHERE loc.lat IS NOT NULL AND loc.lon IS NOT NULL ORDER BY"));
        assert!(!sql.contains("ILIKE"));
        assert!(sql.ends_with("ORDER BY wlb.river, wlb.station"));
    }

    #[test]
    fn test_station_sql_filtered_evening() {
        let filter = build_date_session_filter(Some("2024-07-05"), Some("Evening"));
        let sql = squash(&BulletinRepository::station_readings_sql(&filter, Session::Evening));
        assert!(sql.contains("CAST(wlb.water_level_1800hrs_m AS DOUBLE PRECISION) AS water_level_m"));
        assert!(sql.contains(
            "WHERE (wlb.unique_id ILIKE $1 OR wlb.source_file ILIKE $2) AND loc.lat IS NOT NULL AND loc.lon IS NOT NULL"
        ));
    }
}
