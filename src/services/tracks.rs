use super::crud;
use crate::{
    error::AppError,
    models::{Country, CountryResponse, Difficulty, Track, TrackRequest, TrackResponse},
    repository::{CrudStore, Repository, RepositoryState},
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct TrackService {
    repo: RepositoryState,
}

/// Resolves the owning country of each track, keeping the input order.
///
/// Shared with the race service, which embeds full tracks in its responses.
pub(crate) async fn assemble(
    repo: &dyn Repository,
    tracks: Vec<Track>,
) -> Result<Vec<TrackResponse>, AppError> {
    let mut country_ids: Vec<Uuid> = tracks.iter().map(|t| t.country_id).collect();
    country_ids.sort_unstable();
    country_ids.dedup();

    let countries: HashMap<Uuid, Country> = CrudStore::<Country>::get_many(repo, &country_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    tracks
        .into_iter()
        .map(|track| {
            let country = countries
                .get(&track.country_id)
                .cloned()
                .ok_or_else(|| AppError::not_found("country", track.country_id))?;
            Ok(TrackResponse {
                id: track.id,
                name: track.name,
                difficulty: track.difficulty,
                country: CountryResponse::from(country),
            })
        })
        .collect()
}

impl TrackService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    async fn ensure_country(&self, country_id: Uuid) -> Result<(), AppError> {
        if CrudStore::<Country>::get(&*self.repo, country_id).await?.is_none() {
            return Err(AppError::field("pais_id", "country does not exist"));
        }
        Ok(())
    }

    async fn respond(&self, track: Track) -> Result<TrackResponse, AppError> {
        let id = track.id;
        assemble(&*self.repo, vec![track])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("track", id))
    }

    pub async fn create(&self, req: TrackRequest) -> Result<TrackResponse, AppError> {
        self.ensure_country(req.country_id).await?;
        let track = Track::from_request(Uuid::new_v4(), req);
        let created = crud::create::<Track, _>(&*self.repo, track).await?;
        self.respond(created).await
    }

    pub async fn list_all(&self) -> Result<Vec<TrackResponse>, AppError> {
        let tracks = crud::list_all::<Track, _>(&*self.repo).await?;
        assemble(&*self.repo, tracks).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<TrackResponse, AppError> {
        let track = crud::find_by_id::<Track, _>(&*self.repo, id).await?;
        self.respond(track).await
    }

    pub async fn update(&self, id: Uuid, req: TrackRequest) -> Result<TrackResponse, AppError> {
        crud::find_by_id::<Track, _>(&*self.repo, id).await?;
        self.ensure_country(req.country_id).await?;
        let updated = crud::update(&*self.repo, Track::from_request(id, req)).await?;
        self.respond(updated).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        crud::delete::<Track, _>(&*self.repo, id).await
    }

    pub async fn find_by_country_name(&self, name: &str) -> Result<Vec<TrackResponse>, AppError> {
        let name = crud::filter_value("nome", name)?;
        let tracks = self.repo.find_tracks_by_country_name(name).await?;
        assemble(&*self.repo, tracks).await
    }

    pub async fn find_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<TrackResponse>, AppError> {
        let tracks = self.repo.find_tracks_by_difficulty(difficulty).await?;
        assemble(&*self.repo, tracks).await
    }
}
