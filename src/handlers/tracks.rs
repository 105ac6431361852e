use super::NameFilter;
use crate::{
    error::{AppError, ErrorBody},
    models::{Difficulty, ParseDifficultyError, TrackRequest, TrackResponse},
    services::TrackService,
    validation::{ValidJson, ValidPath, ValidQuery},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

/// DifficultyFilter
///
/// Query string of GET /pistas/buscar/dificuldade. The raw text is parsed with
/// `Difficulty::from_str` so an unknown level is a 400 with a field error.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DifficultyFilter {
    /// FACIL, MEDIO or DIFICIL (English names are accepted too).
    #[serde(default)]
    pub dificuldade: String,
}

/// create_track
///
/// The owning country must already exist.
#[utoipa::path(
    post,
    path = "/pistas",
    tag = "pistas",
    request_body = TrackRequest,
    responses(
        (status = 200, description = "Track created", body = TrackResponse),
        (status = 400, description = "Invalid payload or unknown country", body = ErrorBody)
    )
)]
pub async fn create_track(
    State(service): State<TrackService>,
    ValidJson(payload): ValidJson<TrackRequest>,
) -> Result<Json<TrackResponse>, AppError> {
    Ok(Json(service.create(payload).await?))
}

/// list_tracks
///
/// Every track with its country embedded.
#[utoipa::path(
    get,
    path = "/pistas",
    tag = "pistas",
    responses((status = 200, description = "All tracks", body = [TrackResponse]))
)]
pub async fn list_tracks(
    State(service): State<TrackService>,
) -> Result<Json<Vec<TrackResponse>>, AppError> {
    Ok(Json(service.list_all().await?))
}

/// get_track
#[utoipa::path(
    get,
    path = "/pistas/{id}",
    tag = "pistas",
    params(("id" = Uuid, Path, description = "Track ID")),
    responses(
        (status = 200, description = "Found", body = TrackResponse),
        (status = 404, description = "Track not found", body = ErrorBody)
    )
)]
pub async fn get_track(
    State(service): State<TrackService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<TrackResponse>, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// update_track
///
/// Full replace. The new country must exist.
#[utoipa::path(
    put,
    path = "/pistas/{id}",
    tag = "pistas",
    params(("id" = Uuid, Path, description = "Track ID")),
    request_body = TrackRequest,
    responses(
        (status = 200, description = "Updated", body = TrackResponse),
        (status = 400, description = "Invalid payload or unknown country", body = ErrorBody),
        (status = 404, description = "Track not found", body = ErrorBody)
    )
)]
pub async fn update_track(
    State(service): State<TrackService>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<TrackRequest>,
) -> Result<Json<TrackResponse>, AppError> {
    Ok(Json(service.update(id, payload).await?))
}

/// delete_track
///
/// Rejected with 409 while a race is held on the track.
#[utoipa::path(
    delete,
    path = "/pistas/{id}",
    tag = "pistas",
    params(("id" = Uuid, Path, description = "Track ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Track not found", body = ErrorBody),
        (status = 409, description = "Track still used by a race", body = ErrorBody)
    )
)]
pub async fn delete_track(
    State(service): State<TrackService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// find_tracks_by_country
///
/// Tracks located in the named country. Empty when none.
#[utoipa::path(
    get,
    path = "/pistas/buscar/pais",
    tag = "pistas",
    params(NameFilter),
    responses(
        (status = 200, description = "Tracks located in the country", body = [TrackResponse]),
        (status = 400, description = "Blank name", body = ErrorBody)
    )
)]
pub async fn find_tracks_by_country(
    State(service): State<TrackService>,
    ValidQuery(filter): ValidQuery<NameFilter>,
) -> Result<Json<Vec<TrackResponse>>, AppError> {
    Ok(Json(service.find_by_country_name(&filter.nome).await?))
}

/// find_tracks_by_difficulty
///
/// Tracks of one difficulty level.
#[utoipa::path(
    get,
    path = "/pistas/buscar/dificuldade",
    tag = "pistas",
    params(DifficultyFilter),
    responses(
        (status = 200, description = "Tracks of that difficulty", body = [TrackResponse]),
        (status = 400, description = "Unknown difficulty", body = ErrorBody)
    )
)]
pub async fn find_tracks_by_difficulty(
    State(service): State<TrackService>,
    ValidQuery(filter): ValidQuery<DifficultyFilter>,
) -> Result<Json<Vec<TrackResponse>>, AppError> {
    let difficulty: Difficulty = filter
        .dificuldade
        .parse()
        .map_err(|e: ParseDifficultyError| AppError::field("dificuldade", &e.to_string()))?;
    Ok(Json(service.find_by_difficulty(difficulty).await?))
}
