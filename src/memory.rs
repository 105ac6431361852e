//! In-memory repository.
//!
//! Backs the tests and the `STORAGE_BACKEND=memory` mode. Each table is a `Vec`
//! so listings come back in insertion order, and the constraint rules of the
//! Postgres schema (unique country names, restricting and cascading foreign
//! keys) are replayed under a single write lock.

use crate::{
    error::AppError,
    models::{Championship, Country, Difficulty, Driver, Race, Track},
    repository::{CrudStore, Record, Repository},
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    countries: Vec<Country>,
    tracks: Vec<Track>,
    drivers: Vec<Driver>,
    races: Vec<Race>,
    championships: Vec<Championship>,
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Per-table hooks replaying the relational constraints.
trait MemRecord: Record {
    fn table(tables: &Tables) -> &Vec<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self>;

    /// Runs before an insert or replace of `self`.
    fn check_write(&self, _tables: &Tables) -> Result<(), AppError> {
        Ok(())
    }

    /// Runs before the row with `id` is removed.
    fn on_delete(_tables: &mut Tables, _id: Uuid) -> Result<(), AppError> {
        Ok(())
    }
}

fn foreign_key(constraint: &str) -> AppError {
    AppError::Conflict(format!("foreign key violated: {}", constraint))
}

impl MemRecord for Country {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.countries
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.countries
    }

    fn check_write(&self, tables: &Tables) -> Result<(), AppError> {
        let taken = tables
            .countries
            .iter()
            .any(|c| c.id != self.id && same_name(&c.name, &self.name));
        if taken {
            return Err(AppError::Conflict(
                "unique constraint violated: countries_name_key".to_string(),
            ));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        if tables.tracks.iter().any(|t| t.country_id == id) {
            return Err(foreign_key("tracks_country_id_fkey"));
        }
        Ok(())
    }
}

impl MemRecord for Track {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.tracks
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.tracks
    }

    fn check_write(&self, tables: &Tables) -> Result<(), AppError> {
        if !tables.countries.iter().any(|c| c.id == self.country_id) {
            return Err(foreign_key("tracks_country_id_fkey"));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        if tables.races.iter().any(|r| r.track_id == id) {
            return Err(foreign_key("races_track_id_fkey"));
        }
        Ok(())
    }
}

impl MemRecord for Driver {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.drivers
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.drivers
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        for race in tables.races.iter_mut() {
            race.driver_ids.retain(|driver_id| *driver_id != id);
        }
        Ok(())
    }
}

impl MemRecord for Race {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.races
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.races
    }

    fn check_write(&self, tables: &Tables) -> Result<(), AppError> {
        if !tables.tracks.iter().any(|t| t.id == self.track_id) {
            return Err(foreign_key("races_track_id_fkey"));
        }
        if let Some(championship_id) = self.championship_id {
            if !tables.championships.iter().any(|c| c.id == championship_id) {
                return Err(foreign_key("races_championship_id_fkey"));
            }
        }
        let unknown_driver = self
            .driver_ids
            .iter()
            .any(|id| !tables.drivers.iter().any(|d| d.id == *id));
        if unknown_driver {
            return Err(foreign_key("races_driver_ids_fkey"));
        }
        Ok(())
    }
}

impl MemRecord for Championship {
    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.championships
    }
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.championships
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        for race in tables.races.iter_mut() {
            if race.championship_id == Some(id) {
                race.championship_id = None;
            }
        }
        Ok(())
    }
}

/// InMemoryRepository
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: MemRecord> CrudStore<T> for InMemoryRepository {
    async fn insert(&self, record: T) -> Result<T, AppError> {
        let mut tables = self.tables.write().await;
        if T::table(&tables).iter().any(|r| r.id() == record.id()) {
            return Err(AppError::Conflict(format!(
                "duplicate {} id {}",
                T::KIND,
                record.id()
            )));
        }
        record.check_write(&tables)?;
        T::table_mut(&mut tables).push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<T>, AppError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, AppError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).iter().find(|r| r.id() == id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, AppError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables)
            .iter()
            .filter(|r| ids.contains(&r.id()))
            .cloned()
            .collect())
    }

    async fn replace(&self, record: T) -> Result<Option<T>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(position) = T::table(&tables).iter().position(|r| r.id() == record.id()) else {
            return Ok(None);
        };
        record.check_write(&tables)?;
        T::table_mut(&mut tables)[position] = record.clone();
        Ok(Some(record))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(position) = T::table(&tables).iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        T::on_delete(&mut tables, id)?;
        T::table_mut(&mut tables).remove(position);
        Ok(true)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .countries
            .iter()
            .find(|c| same_name(&c.name, name))
            .cloned())
    }

    async fn find_tracks_by_country_name(&self, name: &str) -> Result<Vec<Track>, AppError> {
        let tables = self.tables.read().await;
        let country_ids: Vec<Uuid> = tables
            .countries
            .iter()
            .filter(|c| same_name(&c.name, name))
            .map(|c| c.id)
            .collect();
        Ok(tables
            .tracks
            .iter()
            .filter(|t| country_ids.contains(&t.country_id))
            .cloned()
            .collect())
    }

    async fn find_tracks_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Track>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tracks
            .iter()
            .filter(|t| t.difficulty == difficulty)
            .cloned()
            .collect())
    }

    async fn find_drivers_by_team(&self, team: &str) -> Result<Vec<Driver>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .drivers
            .iter()
            .filter(|d| same_name(&d.team, team))
            .cloned()
            .collect())
    }

    async fn find_races_by_driver_name(&self, name: &str) -> Result<Vec<Race>, AppError> {
        let tables = self.tables.read().await;
        let driver_ids: Vec<Uuid> = tables
            .drivers
            .iter()
            .filter(|d| same_name(&d.name, name))
            .map(|d| d.id)
            .collect();
        Ok(tables
            .races
            .iter()
            .filter(|r| r.driver_ids.iter().any(|id| driver_ids.contains(id)))
            .cloned()
            .collect())
    }

    async fn find_races_by_country_name(&self, name: &str) -> Result<Vec<Race>, AppError> {
        let tables = self.tables.read().await;
        let track_ids: Vec<Uuid> = tables
            .tracks
            .iter()
            .filter(|t| {
                tables
                    .countries
                    .iter()
                    .any(|c| c.id == t.country_id && same_name(&c.name, name))
            })
            .map(|t| t.id)
            .collect();
        Ok(tables
            .races
            .iter()
            .filter(|r| track_ids.contains(&r.track_id))
            .cloned()
            .collect())
    }

    async fn find_championships_by_team(&self, team: &str) -> Result<Vec<Championship>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .championships
            .iter()
            .filter(|c| c.teams.iter().any(|t| same_name(t, team)))
            .cloned()
            .collect())
    }

    async fn count_races_by_championship(
        &self,
        championship_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, AppError> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for race in &tables.races {
            if let Some(id) = race.championship_id.filter(|id| championship_ids.contains(id)) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
