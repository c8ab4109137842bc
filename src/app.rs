use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::{Config, CorsOrigins};
use crate::db::{BulletinRepository, BulletinStore};
use crate::services::{HydrographService, StationService};

/// Running HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Wire the repository, services and router, then bind the single listener
    pub async fn build(config: Config, pool: PgPool) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let store: Arc<dyn BulletinStore> = Arc::new(BulletinRepository::new(pool));
        let app = build_router(store, &config.cors_origins);

        let addr = config.server_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API listening on http://{}", addr);

        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self { server_handle })
    }

    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}

/// Router with CORS and request tracing around the API routes
pub fn build_router(store: Arc<dyn BulletinStore>, cors_origins: &CorsOrigins) -> Router {
    let state = AppState {
        station_service: StationService::new(store.clone()),
        hydrograph_service: HydrographService::new(store),
    };

    create_router(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}
