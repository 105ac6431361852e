use crate::{AppState, handlers::tracks};
use axum::{Router, routing::get};

pub fn track_routes() -> Router<AppState> {
    Router::new()
        .route("/pistas", get(tracks::list_tracks).post(tracks::create_track))
        // GET /pistas/buscar/pais?nome=...
        .route("/pistas/buscar/pais", get(tracks::find_tracks_by_country))
        // GET /pistas/buscar/dificuldade?dificuldade=FACIL|MEDIO|DIFICIL
        // Unknown levels are a 400 with a field error on `dificuldade`.
        .route(
            "/pistas/buscar/dificuldade",
            get(tracks::find_tracks_by_difficulty),
        )
        .route(
            "/pistas/{id}",
            get(tracks::get_track)
                .put(tracks::update_track)
                .delete(tracks::delete_track),
        )
}
