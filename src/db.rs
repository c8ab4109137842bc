pub mod bulletin_repository;
pub mod bulletin_store;
pub mod error;
pub mod models;
pub mod session_filter;

pub use bulletin_repository::BulletinRepository;
pub use bulletin_store::BulletinStore;
pub use error::DbError;
pub use models::*;
pub use session_filter::{build_date_session_filter, DateSessionFilter, Session};
