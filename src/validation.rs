use crate::{
    error::{AppError, FieldError},
    models::{ChampionshipRequest, CountryRequest, DriverRequest, RaceRequest, TrackRequest},
};
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

pub const MAX_NAME_LEN: usize = 100;
pub const FIRST_SEASON: i32 = 1950;
pub const LAST_SEASON: i32 = 2100;

/// Validate
///
/// Constraint checks that run on a decoded payload before any persistence call.
/// Implementations return every failing field; an empty list means the payload
/// is acceptable.
pub trait Validate {
    fn validate(&self) -> Vec<FieldError>;
}

fn check_name(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "must not be blank"));
    } else if value.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", MAX_NAME_LEN),
        ));
    }
}

impl Validate for CountryRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("nome", &self.name, &mut errors);
        errors
    }
}

impl Validate for TrackRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("nome", &self.name, &mut errors);
        if self.country_id.is_nil() {
            errors.push(FieldError::new("pais_id", "must not be the nil UUID"));
        }
        errors
    }
}

impl Validate for DriverRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("nome", &self.name, &mut errors);
        check_name("equipe", &self.team, &mut errors);
        errors
    }
}

impl Validate for RaceRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("nome", &self.name, &mut errors);
        if self.track_id.is_nil() {
            errors.push(FieldError::new("pista_id", "must not be the nil UUID"));
        }
        let mut seen = HashSet::new();
        if !self.driver_ids.iter().all(|id| seen.insert(*id)) {
            errors.push(FieldError::new("pilotos_ids", "must not contain duplicates"));
        }
        errors
    }
}

impl Validate for ChampionshipRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_name("nome", &self.name, &mut errors);
        if !(FIRST_SEASON..=LAST_SEASON).contains(&self.season) {
            errors.push(FieldError::new(
                "temporada",
                format!("must be between {} and {}", FIRST_SEASON, LAST_SEASON),
            ));
        }
        let mut seen = HashSet::new();
        for team in &self.teams {
            let team = team.trim();
            if team.is_empty() {
                errors.push(FieldError::new("equipes", "team names must not be blank"));
                break;
            }
            if !seen.insert(team.to_lowercase()) {
                errors.push(FieldError::new(
                    "equipes",
                    format!("duplicate team '{}'", team),
                ));
                break;
            }
        }
        errors
    }
}

/// ValidJson
///
/// JSON body extractor that rejects with `AppError` instead of axum's default
/// plain-text rejection: malformed or incomplete bodies become `BadRequest`,
/// constraint failures become `Validation`. Both map to 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;

        let errors = value.validate();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(ValidJson(value))
    }
}

/// ValidPath
///
/// `Path` with the rejection turned into `AppError::BadRequest`, so a malformed
/// id gets the same JSON error body as every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ValidPath(value))
    }
}

/// ValidQuery
///
/// `Query` counterpart of `ValidPath`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ValidQuery(value))
    }
}
