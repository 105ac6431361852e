use super::NameFilter;
use crate::{
    error::{AppError, ErrorBody},
    models::{DriverRequest, DriverResponse},
    services::DriverService,
    validation::{ValidJson, ValidPath, ValidQuery},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

/// create_driver
///
/// Registers a driver.
#[utoipa::path(
    post,
    path = "/pilotos",
    tag = "pilotos",
    request_body = DriverRequest,
    responses(
        (status = 200, description = "Driver created", body = DriverResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_driver(
    State(service): State<DriverService>,
    ValidJson(payload): ValidJson<DriverRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(service.create(payload).await?))
}

/// list_drivers
///
/// Every driver in insertion order.
#[utoipa::path(
    get,
    path = "/pilotos",
    tag = "pilotos",
    responses((status = 200, description = "All drivers", body = [DriverResponse]))
)]
pub async fn list_drivers(
    State(service): State<DriverService>,
) -> Result<Json<Vec<DriverResponse>>, AppError> {
    Ok(Json(service.list_all().await?))
}

/// get_driver
#[utoipa::path(
    get,
    path = "/pilotos/{id}",
    tag = "pilotos",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Found", body = DriverResponse),
        (status = 404, description = "Driver not found", body = ErrorBody)
    )
)]
pub async fn get_driver(
    State(service): State<DriverService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// update_driver
///
/// Full replace of the driver's name and team.
#[utoipa::path(
    put,
    path = "/pilotos/{id}",
    tag = "pilotos",
    params(("id" = Uuid, Path, description = "Driver ID")),
    request_body = DriverRequest,
    responses(
        (status = 200, description = "Updated", body = DriverResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 404, description = "Driver not found", body = ErrorBody)
    )
)]
pub async fn update_driver(
    State(service): State<DriverService>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<DriverRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(service.update(id, payload).await?))
}

/// delete_driver
///
/// Also drops the driver from every race line-up.
#[utoipa::path(
    delete,
    path = "/pilotos/{id}",
    tag = "pilotos",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Driver not found", body = ErrorBody)
    )
)]
pub async fn delete_driver(
    State(service): State<DriverService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// find_drivers_by_team
///
/// Drivers of a team, matched ignoring case. Empty when none.
#[utoipa::path(
    get,
    path = "/pilotos/buscar/equipe",
    tag = "pilotos",
    params(NameFilter),
    responses(
        (status = 200, description = "Drivers of the team", body = [DriverResponse]),
        (status = 400, description = "Blank team", body = ErrorBody)
    )
)]
pub async fn find_drivers_by_team(
    State(service): State<DriverService>,
    ValidQuery(filter): ValidQuery<NameFilter>,
) -> Result<Json<Vec<DriverResponse>>, AppError> {
    Ok(Json(service.find_by_team(&filter.nome).await?))
}
