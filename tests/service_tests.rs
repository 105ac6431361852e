use chrono::NaiveDate;
use f1_catalog::{
    AppError, ChampionshipService, CountryService, DriverService, InMemoryRepository,
    RaceService, TrackService,
    models::{
        ChampionshipRequest, CountryRequest, CountryResponse, Difficulty, DriverRequest,
        DriverResponse, Race, RaceRequest, TrackRequest, TrackResponse,
    },
    repository::{CrudStore, RepositoryState},
    seed,
};
use std::sync::Arc;
use uuid::Uuid;

// --- Test Context ---

/// All five services over one fresh in-memory repository.
struct Catalog {
    repo: RepositoryState,
    countries: CountryService,
    tracks: TrackService,
    drivers: DriverService,
    races: RaceService,
    championships: ChampionshipService,
}

impl Catalog {
    fn new() -> Self {
        let repo = Arc::new(InMemoryRepository::new()) as RepositoryState;
        Catalog {
            countries: CountryService::new(repo.clone()),
            tracks: TrackService::new(repo.clone()),
            drivers: DriverService::new(repo.clone()),
            races: RaceService::new(repo.clone()),
            championships: ChampionshipService::new(repo.clone()),
            repo,
        }
    }

    async fn country(&self, name: &str) -> CountryResponse {
        self.countries
            .create(CountryRequest { name: name.to_string() })
            .await
            .unwrap()
    }

    async fn track(&self, name: &str, country_id: Uuid, difficulty: Difficulty) -> TrackResponse {
        self.tracks
            .create(TrackRequest {
                name: name.to_string(),
                country_id,
                difficulty,
            })
            .await
            .unwrap()
    }

    async fn driver(&self, name: &str, team: &str) -> DriverResponse {
        self.drivers
            .create(DriverRequest {
                name: name.to_string(),
                team: team.to_string(),
            })
            .await
            .unwrap()
    }
}

fn race_request(name: &str, track_id: Uuid) -> RaceRequest {
    RaceRequest {
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
        track_id,
        championship_id: None,
        driver_ids: vec![],
    }
}

fn championship_request(name: &str, teams: &[&str]) -> ChampionshipRequest {
    ChampionshipRequest {
        name: name.to_string(),
        season: 2024,
        teams: teams.iter().map(|t| t.to_string()).collect(),
    }
}

fn field_names(err: &AppError) -> Vec<String> {
    match err {
        AppError::Validation(fields) => fields.iter().map(|f| f.field.clone()).collect(),
        other => panic!("expected a validation error, got {:?}", other),
    }
}

// --- CRUD Contract ---

#[tokio::test]
async fn test_create_then_find_returns_same_record() {
    let catalog = Catalog::new();
    let created = catalog.country("China").await;
    let found = catalog.countries.find_by_id(created.id).await.unwrap();
    assert_eq!(found, created);
    assert_eq!(found.name, "China");
}

#[tokio::test]
async fn test_create_assigns_distinct_ids() {
    let catalog = Catalog::new();
    let a = catalog.driver("Ayrton Senna", "McLaren").await;
    let b = catalog.driver("Ayrton Senna", "McLaren").await;
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_list_keeps_insertion_order() {
    let catalog = Catalog::new();
    for name in ["Brasil", "Itália", "Alemanha"] {
        catalog.country(name).await;
    }
    let names: Vec<String> = catalog
        .countries
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Brasil", "Itália", "Alemanha"]);
}

#[tokio::test]
async fn test_names_are_trimmed_on_write() {
    let catalog = Catalog::new();
    let driver = catalog.driver("  Nelson Piquet ", " Brabham ").await;
    assert_eq!(driver.name, "Nelson Piquet");
    assert_eq!(driver.team, "Brabham");
}

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_id() {
    let catalog = Catalog::new();
    let driver = catalog.driver("Rubens Barrichello", "Jordan").await;
    let updated = catalog
        .drivers
        .update(
            driver.id,
            DriverRequest {
                name: "Rubens Barrichello".to_string(),
                team: "Ferrari".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, driver.id);
    assert_eq!(updated.team, "Ferrari");
    assert_eq!(catalog.drivers.find_by_id(driver.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let catalog = Catalog::new();
    let result = catalog
        .drivers
        .update(
            Uuid::new_v4(),
            DriverRequest {
                name: "Ghost".to_string(),
                team: "None".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound { resource: "driver", .. })));
}

#[tokio::test]
async fn test_update_unknown_track_reports_not_found_before_references() {
    let catalog = Catalog::new();
    let result = catalog
        .tracks
        .update(
            Uuid::new_v4(),
            TrackRequest {
                name: "Imola".to_string(),
                country_id: Uuid::new_v4(),
                difficulty: Difficulty::Medium,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound { resource: "track", .. })));
}

#[tokio::test]
async fn test_championship_update_replaces_fields_and_keeps_race_total() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let track = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;
    let championship = catalog
        .championships
        .create(championship_request("Fórmula 1", &["Ferrari", "McLaren"]))
        .await
        .unwrap();
    let mut request = race_request("GP do Brasil", track.id);
    request.championship_id = Some(championship.id);
    catalog.races.create(request).await.unwrap();

    let updated = catalog
        .championships
        .update(
            championship.id,
            ChampionshipRequest {
                name: "Fórmula 1 Mundial".to_string(),
                season: 2025,
                teams: vec!["Williams".to_string()],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, championship.id);
    assert_eq!(updated.name, "Fórmula 1 Mundial");
    assert_eq!(updated.season, 2025);
    assert_eq!(updated.teams, vec!["Williams"]);
    assert_eq!(updated.total_races, 1);
    assert_eq!(
        catalog.championships.find_by_id(championship.id).await.unwrap(),
        updated
    );
}

#[tokio::test]
async fn test_update_unknown_race_and_championship_write_nothing() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let track = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;

    let result = catalog
        .races
        .update(Uuid::new_v4(), race_request("GP Fantasma", track.id))
        .await;
    assert!(matches!(result, Err(AppError::NotFound { resource: "race", .. })));
    assert!(catalog.races.list_all().await.unwrap().is_empty());

    let result = catalog
        .championships
        .update(Uuid::new_v4(), championship_request("Fórmula E", &["Jaguar"]))
        .await;
    assert!(matches!(
        result,
        Err(AppError::NotFound { resource: "championship", .. })
    ));
    assert!(catalog.championships.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_removes_record_once() {
    let catalog = Catalog::new();
    let country = catalog.country("Hungria").await;
    catalog.countries.delete(country.id).await.unwrap();

    assert!(matches!(
        catalog.countries.find_by_id(country.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        catalog.countries.delete(country.id).await,
        Err(AppError::NotFound { .. })
    ));
}

// --- Uniqueness and References ---

#[tokio::test]
async fn test_country_names_are_unique_ignoring_case() {
    let catalog = Catalog::new();
    catalog.country("Brasil").await;
    let err = catalog
        .countries
        .create(CountryRequest { name: "brasil ".to_string() })
        .await
        .unwrap_err();
    assert_eq!(field_names(&err), vec!["nome"]);
}

#[tokio::test]
async fn test_country_may_be_renamed_to_its_own_name() {
    let catalog = Catalog::new();
    let country = catalog.country("Espanha").await;
    let renamed = catalog
        .countries
        .update(country.id, CountryRequest { name: "ESPANHA".to_string() })
        .await
        .unwrap();
    assert_eq!(renamed.name, "ESPANHA");
}

#[tokio::test]
async fn test_track_requires_existing_country() {
    let catalog = Catalog::new();
    let err = catalog
        .tracks
        .create(TrackRequest {
            name: "Silverstone".to_string(),
            country_id: Uuid::new_v4(),
            difficulty: Difficulty::Medium,
        })
        .await
        .unwrap_err();
    assert_eq!(field_names(&err), vec!["pais_id"]);
}

#[tokio::test]
async fn test_race_reports_every_missing_reference() {
    let catalog = Catalog::new();
    let mut request = race_request("GP Fantasma", Uuid::new_v4());
    request.championship_id = Some(Uuid::new_v4());
    request.driver_ids = vec![Uuid::new_v4()];

    let err = catalog.races.create(request).await.unwrap_err();
    assert_eq!(field_names(&err), vec!["pista_id", "campeonato_id", "pilotos_ids"]);
}

#[tokio::test]
async fn test_race_response_embeds_track_and_drivers() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let interlagos = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;
    let senna = catalog.driver("Ayrton Senna", "McLaren").await;
    let prost = catalog.driver("Alain Prost", "McLaren").await;

    let mut request = race_request("GP do Brasil", interlagos.id);
    request.driver_ids = vec![prost.id, senna.id];
    let race = catalog.races.create(request).await.unwrap();

    assert_eq!(race.track, interlagos);
    assert_eq!(race.track.country.name, "Brasil");
    assert_eq!(race.drivers, vec![prost, senna]);
    assert_eq!(race.championship_id, None);
}

#[tokio::test]
async fn test_delete_country_with_tracks_is_conflict() {
    let catalog = Catalog::new();
    let italia = catalog.country("Itália").await;
    catalog.track("Monza", italia.id, Difficulty::Medium).await;

    let result = catalog.countries.delete(italia.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(catalog.countries.find_by_id(italia.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_track_used_by_race_is_conflict() {
    let catalog = Catalog::new();
    let belgica = catalog.country("Bélgica").await;
    let spa = catalog.track("Spa-Francorchamps", belgica.id, Difficulty::Hard).await;
    catalog.races.create(race_request("GP da Bélgica", spa.id)).await.unwrap();

    let result = catalog.tracks.delete(spa.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_delete_driver_leaves_race_lineups() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let track = catalog.track("Jacarepaguá", brasil.id, Difficulty::Medium).await;
    let piquet = catalog.driver("Nelson Piquet", "Williams").await;
    let mansell = catalog.driver("Nigel Mansell", "Williams").await;

    let mut request = race_request("GP do Brasil 1986", track.id);
    request.driver_ids = vec![piquet.id, mansell.id];
    let race = catalog.races.create(request).await.unwrap();

    catalog.drivers.delete(piquet.id).await.unwrap();

    let race = catalog.races.find_by_id(race.id).await.unwrap();
    assert_eq!(race.drivers, vec![mansell]);
}

#[tokio::test]
async fn test_delete_championship_detaches_races() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let track = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;
    let championship = catalog
        .championships
        .create(championship_request("Fórmula 1", &["Ferrari"]))
        .await
        .unwrap();
    assert_eq!(championship.total_races, 0);

    let mut request = race_request("GP de São Paulo", track.id);
    request.championship_id = Some(championship.id);
    let race = catalog.races.create(request).await.unwrap();

    let counted = catalog.championships.find_by_id(championship.id).await.unwrap();
    assert_eq!(counted.total_races, 1);

    catalog.championships.delete(championship.id).await.unwrap();
    let race = catalog.races.find_by_id(race.id).await.unwrap();
    assert_eq!(race.championship_id, None);
}

#[tokio::test]
async fn test_store_rejects_race_with_vanished_driver() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let track = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;
    let senna = catalog.driver("Ayrton Senna", "McLaren").await;
    catalog.drivers.delete(senna.id).await.unwrap();

    // Written straight to the store, as if the driver vanished after the
    // service checked its references.
    let race = Race {
        id: Uuid::new_v4(),
        name: "GP do Brasil".to_string(),
        date: NaiveDate::from_ymd_opt(1993, 3, 28).unwrap(),
        track_id: track.id,
        championship_id: None,
        driver_ids: vec![senna.id],
    };
    let result = CrudStore::<Race>::insert(&*catalog.repo, race).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(catalog.races.list_all().await.unwrap().is_empty());
}

// --- Filters ---

#[tokio::test]
async fn test_find_country_by_name_ignores_case_and_whitespace() {
    let catalog = Catalog::new();
    let alemanha = catalog.country("Alemanha").await;
    let found = catalog.countries.find_by_name("  aLEMANHA ").await.unwrap();
    assert_eq!(found, alemanha);

    let missing = catalog.countries.find_by_name("Alema").await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn test_tracks_filtered_by_country_and_difficulty() {
    let catalog = Catalog::new();
    let italia = catalog.country("Itália").await;
    let brasil = catalog.country("Brasil").await;
    let monza = catalog.track("Monza", italia.id, Difficulty::Medium).await;
    let imola = catalog.track("Imola", italia.id, Difficulty::Hard).await;
    let interlagos = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;

    let in_italy = catalog.tracks.find_by_country_name("itália").await.unwrap();
    assert_eq!(in_italy, vec![monza, imola.clone()]);

    let hard = catalog.tracks.find_by_difficulty(Difficulty::Hard).await.unwrap();
    assert_eq!(hard, vec![imola, interlagos]);

    let easy = catalog.tracks.find_by_difficulty(Difficulty::Easy).await.unwrap();
    assert!(easy.is_empty());
}

#[tokio::test]
async fn test_drivers_filtered_by_team() {
    let catalog = Catalog::new();
    let hamilton = catalog.driver("Lewis Hamilton", "Mercedes").await;
    catalog.driver("Max Verstappen", "Red Bull").await;

    let found = catalog.drivers.find_by_team("MERCEDES").await.unwrap();
    assert_eq!(found, vec![hamilton]);
    assert!(catalog.drivers.find_by_team("Minardi").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_races_filtered_by_driver_and_country() {
    let catalog = Catalog::new();
    let brasil = catalog.country("Brasil").await;
    let monaco = catalog.country("Mônaco").await;
    let interlagos = catalog.track("Interlagos", brasil.id, Difficulty::Hard).await;
    let monte_carlo = catalog.track("Monte Carlo", monaco.id, Difficulty::Hard).await;
    let senna = catalog.driver("Ayrton Senna", "McLaren").await;

    let mut request = race_request("GP do Brasil", interlagos.id);
    request.driver_ids = vec![senna.id];
    let brazil_race = catalog.races.create(request).await.unwrap();
    let monaco_race = catalog
        .races
        .create(race_request("GP de Mônaco", monte_carlo.id))
        .await
        .unwrap();

    let by_driver = catalog.races.find_by_driver_name("ayrton senna").await.unwrap();
    assert_eq!(by_driver, vec![brazil_race]);

    let by_country = catalog.races.find_by_country_name("MÔNACO").await.unwrap();
    assert_eq!(by_country, vec![monaco_race]);
}

#[tokio::test]
async fn test_championships_filtered_by_team() {
    let catalog = Catalog::new();
    let f1 = catalog
        .championships
        .create(championship_request("Fórmula 1", &["Ferrari", "McLaren"]))
        .await
        .unwrap();
    catalog
        .championships
        .create(championship_request("Fórmula 2", &["Prema"]))
        .await
        .unwrap();

    let found = catalog.championships.find_by_team("ferrari").await.unwrap();
    assert_eq!(found, vec![f1]);

    let missing = catalog.championships.find_by_team("Minardi").await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn test_blank_filter_values_are_rejected() {
    let catalog = Catalog::new();
    let err = catalog.drivers.find_by_team("   ").await.unwrap_err();
    assert_eq!(field_names(&err), vec!["nome"]);
}

// --- Seed and Concurrency ---

#[tokio::test]
async fn test_seed_is_idempotent() {
    let catalog = Catalog::new();
    assert_eq!(seed::seed_catalog(&*catalog.repo).await.unwrap(), 3);
    assert_eq!(seed::seed_catalog(&*catalog.repo).await.unwrap(), 0);

    let names: Vec<String> = catalog
        .countries
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Brasil", "Itália", "Alemanha"]);
}

#[tokio::test]
async fn test_concurrent_creates_are_all_kept() {
    let catalog = Catalog::new();
    let mut handles = Vec::new();
    for i in 0..32 {
        let drivers = catalog.drivers.clone();
        handles.push(tokio::spawn(async move {
            drivers
                .create(DriverRequest {
                    name: format!("Driver {}", i),
                    team: "Grid".to_string(),
                })
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 32);
    assert_eq!(catalog.drivers.list_all().await.unwrap().len(), 32);
}
