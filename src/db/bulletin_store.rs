use futures::future::BoxFuture;

use crate::db::{DateSessionFilter, DbError, HydrographRow, Session, StationReadingRow};

/// Read access to bulletin readings.
///
/// Services receive this handle explicitly rather than reaching for a global
/// pool, which also lets tests swap in an in-memory store.
pub trait BulletinStore: Send + Sync {
    /// Readings joined to station locations, restricted by `filter` and to rows
    /// with both coordinates, ordered by river then station.
    fn station_readings<'a>(
        &'a self,
        filter: &'a DateSessionFilter,
        session: Session,
    ) -> BoxFuture<'a, Result<Vec<StationReadingRow>, DbError>>;

    /// All readings for one station ordered by forecast date then time
    fn hydrograph_rows<'a>(
        &'a self,
        station: &'a str,
    ) -> BoxFuture<'a, Result<Vec<HydrographRow>, DbError>>;
}
