use super::NameFilter;
use crate::{
    error::{AppError, ErrorBody},
    models::{CountryRequest, CountryResponse},
    services::CountryService,
    validation::{ValidJson, ValidPath, ValidQuery},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use uuid::Uuid;

/// create_country
///
/// Registers a country. Names are unique ignoring case.
#[utoipa::path(
    post,
    path = "/paises",
    tag = "paises",
    request_body = CountryRequest,
    responses(
        (status = 200, description = "Country created", body = CountryResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody)
    )
)]
pub async fn create_country(
    State(service): State<CountryService>,
    ValidJson(payload): ValidJson<CountryRequest>,
) -> Result<Json<CountryResponse>, AppError> {
    Ok(Json(service.create(payload).await?))
}

/// list_countries
///
/// Every country in insertion order.
#[utoipa::path(
    get,
    path = "/paises",
    tag = "paises",
    responses((status = 200, description = "All countries", body = [CountryResponse]))
)]
pub async fn list_countries(
    State(service): State<CountryService>,
) -> Result<Json<Vec<CountryResponse>>, AppError> {
    Ok(Json(service.list_all().await?))
}

/// get_country
#[utoipa::path(
    get,
    path = "/paises/{id}",
    tag = "paises",
    params(("id" = Uuid, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Found", body = CountryResponse),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn get_country(
    State(service): State<CountryService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<CountryResponse>, AppError> {
    Ok(Json(service.find_by_id(id).await?))
}

/// update_country
///
/// Renames a country. The new name must not belong to another country.
#[utoipa::path(
    put,
    path = "/paises/{id}",
    tag = "paises",
    params(("id" = Uuid, Path, description = "Country ID")),
    request_body = CountryRequest,
    responses(
        (status = 200, description = "Updated", body = CountryResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 404, description = "Country not found", body = ErrorBody)
    )
)]
pub async fn update_country(
    State(service): State<CountryService>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(payload): ValidJson<CountryRequest>,
) -> Result<Json<CountryResponse>, AppError> {
    Ok(Json(service.update(id, payload).await?))
}

/// delete_country
///
/// Rejected with 409 while a track still belongs to the country.
#[utoipa::path(
    delete,
    path = "/paises/{id}",
    tag = "paises",
    params(("id" = Uuid, Path, description = "Country ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Country not found", body = ErrorBody),
        (status = 409, description = "Country still referenced by a track", body = ErrorBody)
    )
)]
pub async fn delete_country(
    State(service): State<CountryService>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// find_country_by_name
///
/// Returns a single country, unlike the other filter endpoints.
#[utoipa::path(
    get,
    path = "/paises/buscar",
    tag = "paises",
    params(NameFilter),
    responses(
        (status = 200, description = "Found", body = CountryResponse),
        (status = 400, description = "Blank name", body = ErrorBody),
        (status = 404, description = "No country with that name", body = ErrorBody)
    )
)]
pub async fn find_country_by_name(
    State(service): State<CountryService>,
    ValidQuery(filter): ValidQuery<NameFilter>,
) -> Result<Json<CountryResponse>, AppError> {
    Ok(Json(service.find_by_name(&filter.nome).await?))
}
