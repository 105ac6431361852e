use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Shared Enumerations ---

/// Difficulty
///
/// Closed set of track difficulty levels. Serialized with the catalog's
/// Portuguese labels and stored as the Postgres enum `difficulty`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "difficulty")]
#[ts(export)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "FACIL")]
    #[sqlx(rename = "FACIL")]
    Easy,
    #[serde(rename = "MEDIO")]
    #[sqlx(rename = "MEDIO")]
    Medium,
    #[serde(rename = "DIFICIL")]
    #[sqlx(rename = "DIFICIL")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "FACIL",
            Difficulty::Medium => "MEDIO",
            Difficulty::Hard => "DIFICIL",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a textual difficulty is not one of the known levels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}', expected one of FACIL, MEDIO, DIFICIL")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    /// Accepts the Portuguese labels and their English names, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FACIL" | "EASY" => Ok(Difficulty::Easy),
            "MEDIO" | "MEDIUM" => Ok(Difficulty::Medium),
            "DIFICIL" | "HARD" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

// --- Stored Records (Mapped to Database) ---

/// Country
///
/// Row of the `countries` table. `name` is unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
}

/// Track
///
/// Row of the `tracks` table. `country_id` references `countries.id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    pub country_id: Uuid,
    pub difficulty: Difficulty,
}

/// Driver
///
/// Row of the `drivers` table. The team is a free-text name, not a reference.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub team: String,
}

/// Race
///
/// Row of the `races` table. Participants are kept as a `UUID[]` column.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Race {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub track_id: Uuid,
    pub championship_id: Option<Uuid>,
    pub driver_ids: Vec<Uuid>,
}

/// Championship
///
/// Row of the `championships` table. Participating teams are a `TEXT[]` column.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Championship {
    pub id: Uuid,
    pub name: String,
    pub season: i32,
    pub teams: Vec<String>,
}

// --- Request Payloads (Input Schemas) ---

/// CountryRequest
///
/// Body of POST /paises and PUT /paises/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CountryRequest {
    #[serde(rename = "nome")]
    #[schema(example = "China")]
    pub name: String,
}

/// TrackRequest
///
/// Body of POST /pistas and PUT /pistas/{id}. The country must already exist.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TrackRequest {
    #[serde(rename = "nome")]
    #[schema(example = "Interlagos")]
    pub name: String,
    #[serde(rename = "pais_id")]
    pub country_id: Uuid,
    #[serde(rename = "dificuldade")]
    pub difficulty: Difficulty,
}

/// DriverRequest
///
/// Body of POST /pilotos and PUT /pilotos/{id}. The team is free text.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DriverRequest {
    #[serde(rename = "nome")]
    #[schema(example = "Ayrton Senna")]
    pub name: String,
    #[serde(rename = "equipe")]
    #[schema(example = "McLaren")]
    pub team: String,
}

/// RaceRequest
///
/// Body of POST /corridas and PUT /corridas/{id}. The track, the optional
/// championship and every listed driver must already exist.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RaceRequest {
    #[serde(rename = "nome")]
    #[schema(example = "Grande Prêmio do Brasil")]
    pub name: String,
    #[serde(rename = "data")]
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[serde(rename = "pista_id")]
    pub track_id: Uuid,
    #[serde(rename = "campeonato_id", default)]
    pub championship_id: Option<Uuid>,
    #[serde(rename = "pilotos_ids", default)]
    pub driver_ids: Vec<Uuid>,
}

/// ChampionshipRequest
///
/// Body of POST /campeonatos and PUT /campeonatos/{id}. Team names must be
/// distinct ignoring case.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ChampionshipRequest {
    #[serde(rename = "nome")]
    #[schema(example = "Fórmula 1")]
    pub name: String,
    #[serde(rename = "temporada")]
    #[schema(example = 2024)]
    pub season: i32,
    #[serde(rename = "equipes", default)]
    pub teams: Vec<String>,
}

// --- Response Schemas (Output) ---

/// CountryResponse
///
/// A country as returned by the API, also embedded in `TrackResponse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CountryResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
}

/// TrackResponse
///
/// A track with its owning country embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TrackResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dificuldade")]
    pub difficulty: Difficulty,
    #[serde(rename = "pais")]
    pub country: CountryResponse,
}

/// DriverResponse
///
/// A driver as returned by the API, also listed in `RaceResponse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DriverResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "equipe")]
    pub team: String,
}

/// RaceResponse
///
/// A race with its track and participating drivers resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RaceResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data")]
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[serde(rename = "pista")]
    pub track: TrackResponse,
    #[serde(rename = "campeonato_id")]
    pub championship_id: Option<Uuid>,
    #[serde(rename = "pilotos")]
    pub drivers: Vec<DriverResponse>,
}

/// ChampionshipResponse
///
/// `total_races` is derived at read time from the races pointing at the championship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ChampionshipResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "temporada")]
    pub season: i32,
    #[serde(rename = "equipes")]
    pub teams: Vec<String>,
    #[serde(rename = "total_corridas")]
    pub total_races: i64,
}

// --- Record Construction ---

impl Country {
    pub fn from_request(id: Uuid, req: CountryRequest) -> Self {
        Self {
            id,
            name: req.name.trim().to_string(),
        }
    }
}

impl Track {
    pub fn from_request(id: Uuid, req: TrackRequest) -> Self {
        Self {
            id,
            name: req.name.trim().to_string(),
            country_id: req.country_id,
            difficulty: req.difficulty,
        }
    }
}

impl Driver {
    pub fn from_request(id: Uuid, req: DriverRequest) -> Self {
        Self {
            id,
            name: req.name.trim().to_string(),
            team: req.team.trim().to_string(),
        }
    }
}

impl Race {
    pub fn from_request(id: Uuid, req: RaceRequest) -> Self {
        Self {
            id,
            name: req.name.trim().to_string(),
            date: req.date,
            track_id: req.track_id,
            championship_id: req.championship_id,
            driver_ids: req.driver_ids,
        }
    }
}

impl Championship {
    pub fn from_request(id: Uuid, req: ChampionshipRequest) -> Self {
        Self {
            id,
            name: req.name.trim().to_string(),
            season: req.season,
            teams: req.teams.iter().map(|t| t.trim().to_string()).collect(),
        }
    }
}

impl From<Country> for CountryResponse {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
        }
    }
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            name: driver.name,
            team: driver.team,
        }
    }
}
