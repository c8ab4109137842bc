use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::db::{
    FeatureCollection, HydrographPoint, PointGeometry, StationFeature, StationProperties,
};
use crate::services::{HydrographService, StationService};

#[derive(Clone)]
pub struct AppState {
    pub station_service: StationService,
    pub hydrograph_service: HydrographService,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced to API callers. Server-side details never leave the process.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StationsParams {
    /// Bulletin date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// `Morning` or `Evening`
    pub session: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HydrographParams {
    /// Station name as it appears in the bulletin
    pub station: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_stations, get_hydrograph),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        FeatureCollection,
        StationFeature,
        PointGeometry,
        StationProperties,
        HydrographPoint
    )),
    tags((name = "river-levels", description = "River water-level bulletins"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/stations", get(get_stations))
        .route("/hydrograph", get(get_hydrograph))
        .route("/openapi.json", get(openapi_json))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "river-levels",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument]
async fn health() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse { ok: true })
}

#[utoipa::path(
    get,
    path = "/api/stations",
    tag = "river-levels",
    params(StationsParams),
    responses(
        (status = 200, description = "Located stations for the date and session", body = FeatureCollection),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_stations(
    State(state): State<AppState>,
    Query(params): Query<StationsParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    debug!("Fetching stations for date={:?} session={:?}", params.date, params.session);

    let collection = state
        .station_service
        .get_feature_collection(params.date.as_deref(), params.session.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to fetch stations: {}", e);
            ApiError::Internal
        })?;

    info!("Returning {} station features", collection.features.len());
    Ok(Json(collection))
}

#[utoipa::path(
    get,
    path = "/api/hydrograph",
    tag = "river-levels",
    params(HydrographParams),
    responses(
        (status = 200, description = "Time series for the station", body = [HydrographPoint]),
        (status = 400, description = "Missing station parameter", body = ErrorResponse),
        (status = 500, description = "Query failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_hydrograph(
    State(state): State<AppState>,
    Query(params): Query<HydrographParams>,
) -> Result<Json<Vec<HydrographPoint>>, ApiError> {
    let station = match params.station.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => {
            warn!("Hydrograph requested without a station");
            return Err(ApiError::BadRequest("station is required".to_string()));
        }
    };

    let points = state
        .hydrograph_service
        .get_series(station)
        .await
        .map_err(|e| {
            error!("Failed to fetch hydrograph for station {}: {}", station, e);
            ApiError::Internal
        })?;

    info!("Returning {} hydrograph points for station {}", points.len(), station);
    Ok(Json(points))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(generate_openapi_spec())
}
