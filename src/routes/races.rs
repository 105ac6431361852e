use crate::{AppState, handlers::races};
use axum::{Router, routing::get};

/// Race Router
///
/// Race responses embed their track (with its country) and their drivers.
pub fn race_routes() -> Router<AppState> {
    Router::new()
        .route("/corridas", get(races::list_races).post(races::create_race))
        // GET /corridas/buscar/piloto?nome=...
        .route("/corridas/buscar/piloto", get(races::find_races_by_driver))
        // GET /corridas/buscar/pais?nome=...
        // Matches on the country of the race's track.
        .route("/corridas/buscar/pais", get(races::find_races_by_country))
        .route(
            "/corridas/{id}",
            get(races::get_race)
                .put(races::update_race)
                .delete(races::delete_race),
        )
}
