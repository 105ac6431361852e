use crate::{AppState, handlers::championships};
use axum::{Router, routing::get};

pub fn championship_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/campeonatos",
            get(championships::list_championships).post(championships::create_championship),
        )
        // GET /campeonatos/buscar/equipe?nome=...
        // 404 when no championship lists the team.
        .route(
            "/campeonatos/buscar/equipe",
            get(championships::find_championships_by_team),
        )
        // DELETE keeps the races and clears their championship.
        .route(
            "/campeonatos/{id}",
            get(championships::get_championship)
                .put(championships::update_championship)
                .delete(championships::delete_championship),
        )
}
