use super::crud;
use crate::{
    error::AppError,
    models::{Championship, ChampionshipRequest, ChampionshipResponse},
    repository::RepositoryState,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChampionshipService {
    repo: RepositoryState,
}

impl ChampionshipService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// Attaches the derived race count to each championship.
    async fn assemble(
        &self,
        championships: Vec<Championship>,
    ) -> Result<Vec<ChampionshipResponse>, AppError> {
        let ids: Vec<Uuid> = championships.iter().map(|c| c.id).collect();
        let counts = self.repo.count_races_by_championship(&ids).await?;
        Ok(championships
            .into_iter()
            .map(|c| ChampionshipResponse {
                total_races: counts.get(&c.id).copied().unwrap_or(0),
                id: c.id,
                name: c.name,
                season: c.season,
                teams: c.teams,
            })
            .collect())
    }

    async fn respond(&self, championship: Championship) -> Result<ChampionshipResponse, AppError> {
        let id = championship.id;
        self.assemble(vec![championship])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("championship", id))
    }

    pub async fn create(&self, req: ChampionshipRequest) -> Result<ChampionshipResponse, AppError> {
        let championship = Championship::from_request(Uuid::new_v4(), req);
        let created = crud::create::<Championship, _>(&*self.repo, championship).await?;
        self.respond(created).await
    }

    pub async fn list_all(&self) -> Result<Vec<ChampionshipResponse>, AppError> {
        let championships = crud::list_all::<Championship, _>(&*self.repo).await?;
        self.assemble(championships).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<ChampionshipResponse, AppError> {
        let championship = crud::find_by_id::<Championship, _>(&*self.repo, id).await?;
        self.respond(championship).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: ChampionshipRequest,
    ) -> Result<ChampionshipResponse, AppError> {
        let updated = crud::update(&*self.repo, Championship::from_request(id, req)).await?;
        self.respond(updated).await
    }

    /// Races of the championship stay, detached from it.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        crud::delete::<Championship, _>(&*self.repo, id).await
    }

    /// Championships in which the team takes part; not-found when there are none.
    pub async fn find_by_team(&self, team: &str) -> Result<Vec<ChampionshipResponse>, AppError> {
        let team = crud::filter_value("nome", team)?;
        let championships = self.repo.find_championships_by_team(team).await?;
        if championships.is_empty() {
            return Err(AppError::NotFound {
                resource: "championship",
                key: format!("team {}", team),
            });
        }
        self.assemble(championships).await
    }
}
