use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use f1_catalog::{
    AppConfig, AppError, AppState, InMemoryRepository,
    handlers::{self, NameFilter, tracks::DifficultyFilter},
    models::{ChampionshipRequest, CountryRequest, Difficulty, DriverRequest, RaceRequest, TrackRequest},
    repository::RepositoryState,
    validation::{ValidJson, ValidPath, ValidQuery},
};
use std::sync::Arc;
use tokio::test;
use uuid::Uuid;

// Handlers are plain async functions over extractors, so they can be driven
// without a router. Each test builds a fresh in-memory state.
fn state() -> AppState {
    let repo = Arc::new(InMemoryRepository::new()) as RepositoryState;
    AppState::new(repo, AppConfig::default())
}

fn name_filter(value: &str) -> ValidQuery<NameFilter> {
    ValidQuery(NameFilter {
        nome: value.to_string(),
    })
}

async fn seed_country(state: &AppState, name: &str) -> Uuid {
    let Json(country) = handlers::countries::create_country(
        State(state.countries.clone()),
        ValidJson(CountryRequest {
            name: name.to_string(),
        }),
    )
    .await
    .unwrap();
    country.id
}

// --- Country Handlers ---

#[test]
async fn test_create_and_get_country() {
    let state = state();
    let id = seed_country(&state, "China").await;

    let Json(found) = handlers::countries::get_country(State(state.countries.clone()), ValidPath(id))
        .await
        .unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, "China");
}

#[test]
async fn test_list_countries_handler() {
    let state = state();
    seed_country(&state, "Brasil").await;
    seed_country(&state, "Itália").await;

    let Json(countries) = handlers::countries::list_countries(State(state.countries.clone()))
        .await
        .unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[1].name, "Itália");
}

#[test]
async fn test_delete_country_handler_returns_no_content() {
    let state = state();
    let id = seed_country(&state, "Canadá").await;

    let status = handlers::countries::delete_country(State(state.countries.clone()), ValidPath(id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[test]
async fn test_get_unknown_country_maps_to_404() {
    let state = state();
    let err = handlers::countries::get_country(State(state.countries.clone()), ValidPath(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_find_country_by_name_handler() {
    let state = state();
    let id = seed_country(&state, "Alemanha").await;

    let Json(found) =
        handlers::countries::find_country_by_name(State(state.countries.clone()), name_filter("alemanha"))
            .await
            .unwrap();
    assert_eq!(found.id, id);
}

// --- Track Handlers ---

#[test]
async fn test_update_track_handler() {
    let state = state();
    let country_id = seed_country(&state, "Reino Unido").await;
    let Json(track) = handlers::tracks::create_track(
        State(state.tracks.clone()),
        ValidJson(TrackRequest {
            name: "Silverstone".to_string(),
            country_id,
            difficulty: Difficulty::Easy,
        }),
    )
    .await
    .unwrap();

    let Json(updated) = handlers::tracks::update_track(
        State(state.tracks.clone()),
        ValidPath(track.id),
        ValidJson(TrackRequest {
            name: "Silverstone Circuit".to_string(),
            country_id,
            difficulty: Difficulty::Medium,
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.id, track.id);
    assert_eq!(updated.name, "Silverstone Circuit");
    assert_eq!(updated.difficulty, Difficulty::Medium);
    assert_eq!(updated.country.id, country_id);
}

#[test]
async fn test_difficulty_handler_rejects_unknown_level() {
    let state = state();
    let err = handlers::tracks::find_tracks_by_difficulty(
        State(state.tracks.clone()),
        ValidQuery(DifficultyFilter {
            dificuldade: "IMPOSSIVEL".to_string(),
        }),
    )
    .await
    .unwrap_err();

    match &err {
        AppError::Validation(fields) => assert_eq!(fields[0].field, "dificuldade"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
async fn test_difficulty_handler_accepts_english_names() {
    let state = state();
    let Json(tracks) = handlers::tracks::find_tracks_by_difficulty(
        State(state.tracks.clone()),
        ValidQuery(DifficultyFilter {
            dificuldade: "hard".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(tracks.is_empty());
}

// --- Driver, Race and Championship Handlers ---

#[test]
async fn test_race_handler_resolves_participants() {
    let state = state();
    let country_id = seed_country(&state, "Austrália").await;
    let Json(track) = handlers::tracks::create_track(
        State(state.tracks.clone()),
        ValidJson(TrackRequest {
            name: "Albert Park".to_string(),
            country_id,
            difficulty: Difficulty::Medium,
        }),
    )
    .await
    .unwrap();
    let Json(driver) = handlers::drivers::create_driver(
        State(state.drivers.clone()),
        ValidJson(DriverRequest {
            name: "Mark Webber".to_string(),
            team: "Red Bull".to_string(),
        }),
    )
    .await
    .unwrap();

    let Json(race) = handlers::races::create_race(
        State(state.races.clone()),
        ValidJson(RaceRequest {
            name: "GP da Austrália".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2010, 3, 28).unwrap(),
            track_id: track.id,
            championship_id: None,
            driver_ids: vec![driver.id],
        }),
    )
    .await
    .unwrap();
    assert_eq!(race.track.id, track.id);
    assert_eq!(race.drivers, vec![driver]);

    let Json(by_driver) =
        handlers::races::find_races_by_driver(State(state.races.clone()), name_filter("Mark Webber"))
            .await
            .unwrap();
    assert_eq!(by_driver.len(), 1);
}

#[test]
async fn test_championship_team_filter_handler() {
    let state = state();
    handlers::championships::create_championship(
        State(state.championships.clone()),
        ValidJson(ChampionshipRequest {
            name: "Fórmula 1".to_string(),
            season: 2010,
            teams: vec!["Red Bull".to_string(), "Ferrari".to_string()],
        }),
    )
    .await
    .unwrap();

    let Json(found) = handlers::championships::find_championships_by_team(
        State(state.championships.clone()),
        name_filter("red bull"),
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].season, 2010);

    let err = handlers::championships::find_championships_by_team(
        State(state.championships.clone()),
        name_filter("Brawn"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_driver_team_filter_handler_returns_empty_list() {
    let state = state();
    let Json(found) = handlers::drivers::find_drivers_by_team(State(state.drivers.clone()), name_filter("Brawn"))
        .await
        .unwrap();
    assert!(found.is_empty());
}
