use axum::{
    Json, Router,
    extract::FromRef,
    http::HeaderName,
    routing::get,
};
use utoipa::OpenApi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod validation;

// One router module per catalog resource.
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use memory::InMemoryRepository;
pub use repository::{PostgresRepository, RepositoryState};
pub use services::{ChampionshipService, CountryService, DriverService, RaceService, TrackService};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into one
/// OpenAPI document, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::countries::create_country, handlers::countries::list_countries,
        handlers::countries::get_country, handlers::countries::update_country,
        handlers::countries::delete_country, handlers::countries::find_country_by_name,
        handlers::tracks::create_track, handlers::tracks::list_tracks,
        handlers::tracks::get_track, handlers::tracks::update_track,
        handlers::tracks::delete_track, handlers::tracks::find_tracks_by_country,
        handlers::tracks::find_tracks_by_difficulty,
        handlers::drivers::create_driver, handlers::drivers::list_drivers,
        handlers::drivers::get_driver, handlers::drivers::update_driver,
        handlers::drivers::delete_driver, handlers::drivers::find_drivers_by_team,
        handlers::races::create_race, handlers::races::list_races,
        handlers::races::get_race, handlers::races::update_race,
        handlers::races::delete_race, handlers::races::find_races_by_driver,
        handlers::races::find_races_by_country,
        handlers::championships::create_championship, handlers::championships::list_championships,
        handlers::championships::get_championship, handlers::championships::update_championship,
        handlers::championships::delete_championship, handlers::championships::find_championships_by_team,
    ),
    components(
        schemas(
            models::Difficulty,
            models::CountryRequest, models::CountryResponse,
            models::TrackRequest, models::TrackResponse,
            models::DriverRequest, models::DriverResponse,
            models::RaceRequest, models::RaceResponse,
            models::ChampionshipRequest, models::ChampionshipResponse,
            error::ErrorBody, error::ErrorDetail, error::FieldError,
        )
    ),
    tags(
        (name = "paises", description = "Países"),
        (name = "pistas", description = "Pistas de Fórmula 1"),
        (name = "pilotos", description = "Pilotos de Fórmula 1"),
        (name = "corridas", description = "Corridas de Fórmula 1"),
        (name = "campeonatos", description = "Campeonatos de Fórmula 1"),
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Service locator built once at startup. Every service shares the same
/// repository; handlers pull the one they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub countries: CountryService,
    pub tracks: TrackService,
    pub drivers: DriverService,
    pub races: RaceService,
    pub championships: ChampionshipService,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self {
            countries: CountryService::new(repo.clone()),
            tracks: TrackService::new(repo.clone()),
            drivers: DriverService::new(repo.clone()),
            races: RaceService::new(repo.clone()),
            championships: ChampionshipService::new(repo),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for CountryService {
    fn from_ref(app_state: &AppState) -> CountryService {
        app_state.countries.clone()
    }
}

impl FromRef<AppState> for TrackService {
    fn from_ref(app_state: &AppState) -> TrackService {
        app_state.tracks.clone()
    }
}

impl FromRef<AppState> for DriverService {
    fn from_ref(app_state: &AppState) -> DriverService {
        app_state.drivers.clone()
    }
}

impl FromRef<AppState> for RaceService {
    fn from_ref(app_state: &AppState) -> RaceService {
        app_state.races.clone()
    }
}

impl FromRef<AppState> for ChampionshipService {
    fn from_ref(app_state: &AppState) -> ChampionshipService {
        app_state.championships.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the resource routers, applies the request-id, tracing and CORS
/// layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(routes::countries::country_routes())
        .merge(routes::tracks::track_routes())
        .merge(routes::drivers::driver_routes())
        .merge(routes::races::race_routes())
        .merge(routes::championships::championship_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Outermost: every request gets an id before the span is opened.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span with method, URI and the `x-request-id` set by
/// `SetRequestIdLayer`, so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
