use super::NameFilter;
use crate::{
    error::{AppError, ErrorBody},
    models::{RaceRequest, RaceResponse},
    services::RaceService,
    validation::{ValidJson, ValidPath, ValidQuery},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

/// create_race
///
/// The track, the optional championship and every listed driver must exist.
/// Missing references come back together as field errors.
#[utoipa::path(
    post,
    path = "/corridas",
    tag = "corridas",
    request_body = RaceRequest,
    responses(
        (status = 200, description = "Race created", body = RaceResponse),
        (status = 400, description = "Invalid payload or unknown reference", body = ErrorBody)
    )
)]
pub async fn create_race(
    State(service): State<RaceService>,
    ValidJson(payload): ValidJson<RaceRequest>,
) -> Result<Json<RaceResponse>, AppError> {
    Ok(Json(service.create(payload).await?))
}

/// list_races
///
/// Every race with its track and drivers resolved.
#[utoipa::path(
    get,
    path = "/corridas",
    tag = "corridas",
    responses((status = 200, description = "All races", body = [RaceResponse]))
)]
pub async fn list_races(
    State(service): State<RaceService>,
) -> Result<Json<Vec<RaceResponse>>, AppError> {
    Ok(Json(service.list_all().await?))
}

/// get_race
#[utoipa::path(
    get,
    path = "/corridas/{id}",
    tag = "corridas",
    params(("id" = Uuid, Path, description = "Race ID")),
    responses(
        (status = 200, description = "Found", body = RaceResponse),
        (status = 404, description = "Race not found", body = ErrorBody)
    )
)]
pub async fn get_race(
    State(service): State<RaceService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<RaceResponse>, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// update_race
///
/// Full replace. Omitted `campeonato_id` and `pilotos_ids` are cleared.
#[utoipa::path(
    put,
    path = "/corridas/{id}",
    tag = "corridas",
    params(("id" = Uuid, Path, description = "Race ID")),
    request_body = RaceRequest,
    responses(
        (status = 200, description = "Updated", body = RaceResponse),
        (status = 400, description = "Invalid payload or unknown reference", body = ErrorBody),
        (status = 404, description = "Race not found", body = ErrorBody)
    )
)]
pub async fn update_race(
    State(service): State<RaceService>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<RaceRequest>,
) -> Result<Json<RaceResponse>, AppError> {
    Ok(Json(service.update(id, payload).await?))
}

/// delete_race
#[utoipa::path(
    delete,
    path = "/corridas/{id}",
    tag = "corridas",
    params(("id" = Uuid, Path, description = "Race ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Race not found", body = ErrorBody)
    )
)]
pub async fn delete_race(
    State(service): State<RaceService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// find_races_by_driver
///
/// Races in which a driver with that name took part.
#[utoipa::path(
    get,
    path = "/corridas/buscar/piloto",
    tag = "corridas",
    params(NameFilter),
    responses(
        (status = 200, description = "Races the driver took part in", body = [RaceResponse]),
        (status = 400, description = "Blank name", body = ErrorBody)
    )
)]
pub async fn find_races_by_driver(
    State(service): State<RaceService>,
    ValidQuery(filter): ValidQuery<NameFilter>,
) -> Result<Json<Vec<RaceResponse>>, AppError> {
    Ok(Json(service.find_by_driver_name(&filter.nome).await?))
}

/// find_races_by_country
///
/// Races held on tracks located in the named country.
#[utoipa::path(
    get,
    path = "/corridas/buscar/pais",
    tag = "corridas",
    params(NameFilter),
    responses(
        (status = 200, description = "Races held in the country", body = [RaceResponse]),
        (status = 400, description = "Blank name", body = ErrorBody)
    )
)]
pub async fn find_races_by_country(
    State(service): State<RaceService>,
    ValidQuery(filter): ValidQuery<NameFilter>,
) -> Result<Json<Vec<RaceResponse>>, AppError> {
    Ok(Json(service.find_by_country_name(&filter.nome).await?))
}
