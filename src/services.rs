pub mod hydrograph_service;
pub mod station_service;

pub use hydrograph_service::HydrographService;
pub use station_service::StationService;
