use super::NameFilter;
use crate::{
    error::{AppError, ErrorBody},
    models::{ChampionshipRequest, ChampionshipResponse},
    services::ChampionshipService,
    validation::{ValidJson, ValidPath, ValidQuery},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

/// create_championship
///
/// Registers a championship. `total_corridas` starts at zero.
#[utoipa::path(
    post,
    path = "/campeonatos",
    tag = "campeonatos",
    request_body = ChampionshipRequest,
    responses(
        (status = 200, description = "Championship created", body = ChampionshipResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_championship(
    State(service): State<ChampionshipService>,
    ValidJson(payload): ValidJson<ChampionshipRequest>,
) -> Result<Json<ChampionshipResponse>, AppError> {
    Ok(Json(service.create(payload).await?))
}

/// list_championships
///
/// Every championship with its current race total.
#[utoipa::path(
    get,
    path = "/campeonatos",
    tag = "campeonatos",
    responses((status = 200, description = "All championships", body = [ChampionshipResponse]))
)]
pub async fn list_championships(
    State(service): State<ChampionshipService>,
) -> Result<Json<Vec<ChampionshipResponse>>, AppError> {
    Ok(Json(service.list_all().await?))
}

/// get_championship
#[utoipa::path(
    get,
    path = "/campeonatos/{id}",
    tag = "campeonatos",
    params(("id" = Uuid, Path, description = "Championship ID")),
    responses(
        (status = 200, description = "Found", body = ChampionshipResponse),
        (status = 404, description = "Championship not found", body = ErrorBody)
    )
)]
pub async fn get_championship(
    State(service): State<ChampionshipService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ChampionshipResponse>, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// update_championship
///
/// Full replace. The race total is recomputed, not taken from the body.
#[utoipa::path(
    put,
    path = "/campeonatos/{id}",
    tag = "campeonatos",
    params(("id" = Uuid, Path, description = "Championship ID")),
    request_body = ChampionshipRequest,
    responses(
        (status = 200, description = "Updated", body = ChampionshipResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 404, description = "Championship not found", body = ErrorBody)
    )
)]
pub async fn update_championship(
    State(service): State<ChampionshipService>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<ChampionshipRequest>,
) -> Result<Json<ChampionshipResponse>, AppError> {
    Ok(Json(service.update(id, payload).await?))
}

/// delete_championship
///
/// Races of the championship are kept and detached from it.
#[utoipa::path(
    delete,
    path = "/campeonatos/{id}",
    tag = "campeonatos",
    params(("id" = Uuid, Path, description = "Championship ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Championship not found", body = ErrorBody)
    )
)]
pub async fn delete_championship(
    State(service): State<ChampionshipService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// find_championships_by_team
///
/// 404 when no championship lists the team.
#[utoipa::path(
    get,
    path = "/campeonatos/buscar/equipe",
    tag = "campeonatos",
    params(NameFilter),
    responses(
        (status = 200, description = "Championships the team took part in", body = [ChampionshipResponse]),
        (status = 400, description = "Blank team", body = ErrorBody),
        (status = 404, description = "No championship lists the team", body = ErrorBody)
    )
)]
pub async fn find_championships_by_team(
    State(service): State<ChampionshipService>,
    ValidQuery(filter): ValidQuery<NameFilter>,
) -> Result<Json<Vec<ChampionshipResponse>>, AppError> {
    Ok(Json(service.find_by_team(&filter.nome).await?))
}
