use super::crud;
use crate::{
    error::AppError,
    models::{Country, CountryRequest, CountryResponse},
    repository::RepositoryState,
};
use uuid::Uuid;

/// CountryService
///
/// Country names are unique ignoring case; the check runs here so the client
/// gets a field error instead of a storage conflict.
#[derive(Clone)]
pub struct CountryService {
    repo: RepositoryState,
}

impl CountryService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    async fn ensure_name_free(&self, name: &str, own_id: Option<Uuid>) -> Result<(), AppError> {
        match self.repo.find_country_by_name(name.trim()).await? {
            Some(existing) if Some(existing.id) != own_id => {
                Err(AppError::field("nome", "a country with this name already exists"))
            }
            _ => Ok(()),
        }
    }

    pub async fn create(&self, req: CountryRequest) -> Result<CountryResponse, AppError> {
        self.ensure_name_free(&req.name, None).await?;
        let country = Country::from_request(Uuid::new_v4(), req);
        let created = crud::create::<Country, _>(&*self.repo, country).await?;
        Ok(created.into())
    }

    pub async fn list_all(&self) -> Result<Vec<CountryResponse>, AppError> {
        let countries = crud::list_all::<Country, _>(&*self.repo).await?;
        Ok(countries.into_iter().map(CountryResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<CountryResponse, AppError> {
        let country = crud::find_by_id::<Country, _>(&*self.repo, id).await?;
        Ok(country.into())
    }

    pub async fn update(&self, id: Uuid, req: CountryRequest) -> Result<CountryResponse, AppError> {
        crud::find_by_id::<Country, _>(&*self.repo, id).await?;
        self.ensure_name_free(&req.name, Some(id)).await?;
        let updated = crud::update(&*self.repo, Country::from_request(id, req)).await?;
        Ok(updated.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        crud::delete::<Country, _>(&*self.repo, id).await
    }

    /// Single country whose name matches ignoring case; not-found when none does.
    pub async fn find_by_name(&self, name: &str) -> Result<CountryResponse, AppError> {
        let name = crud::filter_value("nome", name)?;
        self.repo
            .find_country_by_name(name)
            .await?
            .map(CountryResponse::from)
            .ok_or_else(|| AppError::NotFound {
                resource: "country",
                key: name.to_string(),
            })
    }
}
