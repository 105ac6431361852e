use super::crud;
use crate::{
    error::AppError,
    models::{Driver, DriverRequest, DriverResponse},
    repository::RepositoryState,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct DriverService {
    repo: RepositoryState,
}

impl DriverService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    pub async fn create(&self, req: DriverRequest) -> Result<DriverResponse, AppError> {
        let driver = Driver::from_request(Uuid::new_v4(), req);
        let created = crud::create::<Driver, _>(&*self.repo, driver).await?;
        Ok(created.into())
    }

    pub async fn list_all(&self) -> Result<Vec<DriverResponse>, AppError> {
        let drivers = crud::list_all::<Driver, _>(&*self.repo).await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<DriverResponse, AppError> {
        let driver = crud::find_by_id::<Driver, _>(&*self.repo, id).await?;
        Ok(driver.into())
    }

    pub async fn update(&self, id: Uuid, req: DriverRequest) -> Result<DriverResponse, AppError> {
        let updated = crud::update(&*self.repo, Driver::from_request(id, req)).await?;
        Ok(updated.into())
    }

    /// Also removes the driver from every race it took part in.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        crud::delete::<Driver, _>(&*self.repo, id).await
    }

    pub async fn find_by_team(&self, team: &str) -> Result<Vec<DriverResponse>, AppError> {
        let team = crud::filter_value("nome", team)?;
        let drivers = self.repo.find_drivers_by_team(team).await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }
}
