use super::{crud, tracks};
use crate::{
    error::{AppError, FieldError},
    models::{Championship, Driver, DriverResponse, Race, RaceRequest, RaceResponse, Track},
    repository::{CrudStore, RepositoryState},
};
use std::collections::HashMap;
use uuid::Uuid;

/// RaceService
///
/// A race points at a track, optionally at a championship, and at a set of
/// drivers. All of them are checked before the write so the client gets field
/// errors. A reference deleted between that check and the write is caught by
/// the store itself and surfaces as a conflict.
#[derive(Clone)]
pub struct RaceService {
    repo: RepositoryState,
}

impl RaceService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip_all)]
    async fn ensure_references(&self, req: &RaceRequest) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if CrudStore::<Track>::get(&*self.repo, req.track_id).await?.is_none() {
            errors.push(FieldError::new("pista_id", "track does not exist"));
        }

        if let Some(championship_id) = req.championship_id {
            if CrudStore::<Championship>::get(&*self.repo, championship_id)
                .await?
                .is_none()
            {
                errors.push(FieldError::new("campeonato_id", "championship does not exist"));
            }
        }

        let found = CrudStore::<Driver>::get_many(&*self.repo, &req.driver_ids).await?;
        let missing: Vec<String> = req
            .driver_ids
            .iter()
            .filter(|id| !found.iter().any(|d| d.id == **id))
            .map(Uuid::to_string)
            .collect();
        if !missing.is_empty() {
            errors.push(FieldError::new(
                "pilotos_ids",
                format!("unknown drivers: {}", missing.join(", ")),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    async fn assemble(&self, races: Vec<Race>) -> Result<Vec<RaceResponse>, AppError> {
        let track_ids: Vec<Uuid> = races.iter().map(|r| r.track_id).collect();
        let found_tracks = CrudStore::<Track>::get_many(&*self.repo, &track_ids).await?;
        let tracks_by_id: HashMap<Uuid, _> = tracks::assemble(&*self.repo, found_tracks)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let driver_ids: Vec<Uuid> = races.iter().flat_map(|r| r.driver_ids.clone()).collect();
        let drivers_by_id: HashMap<Uuid, Driver> = CrudStore::<Driver>::get_many(&*self.repo, &driver_ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        races
            .into_iter()
            .map(|race| {
                let track = tracks_by_id
                    .get(&race.track_id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("track", race.track_id))?;
                let drivers = race
                    .driver_ids
                    .iter()
                    .filter_map(|id| drivers_by_id.get(id).cloned())
                    .map(DriverResponse::from)
                    .collect();
                Ok(RaceResponse {
                    id: race.id,
                    name: race.name,
                    date: race.date,
                    track,
                    championship_id: race.championship_id,
                    drivers,
                })
            })
            .collect()
    }

    async fn respond(&self, race: Race) -> Result<RaceResponse, AppError> {
        let id = race.id;
        self.assemble(vec![race])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("race", id))
    }

    pub async fn create(&self, req: RaceRequest) -> Result<RaceResponse, AppError> {
        self.ensure_references(&req).await?;
        let race = Race::from_request(Uuid::new_v4(), req);
        let created = crud::create::<Race, _>(&*self.repo, race).await?;
        self.respond(created).await
    }

    pub async fn list_all(&self) -> Result<Vec<RaceResponse>, AppError> {
        let races = crud::list_all::<Race, _>(&*self.repo).await?;
        self.assemble(races).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<RaceResponse, AppError> {
        let race = crud::find_by_id::<Race, _>(&*self.repo, id).await?;
        self.respond(race).await
    }

    pub async fn update(&self, id: Uuid, req: RaceRequest) -> Result<RaceResponse, AppError> {
        crud::find_by_id::<Race, _>(&*self.repo, id).await?;
        self.ensure_references(&req).await?;
        let updated = crud::update(&*self.repo, Race::from_request(id, req)).await?;
        self.respond(updated).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        crud::delete::<Race, _>(&*self.repo, id).await
    }

    pub async fn find_by_driver_name(&self, name: &str) -> Result<Vec<RaceResponse>, AppError> {
        let name = crud::filter_value("nome", name)?;
        let races = self.repo.find_races_by_driver_name(name).await?;
        self.assemble(races).await
    }

    pub async fn find_by_country_name(&self, name: &str) -> Result<Vec<RaceResponse>, AppError> {
        let name = crud::filter_value("nome", name)?;
        let races = self.repo.find_races_by_country_name(name).await?;
        self.assemble(races).await
    }
}
