use crate::{AppState, handlers::drivers};
use axum::{Router, routing::get};

pub fn driver_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pilotos",
            get(drivers::list_drivers).post(drivers::create_driver),
        )
        // GET /pilotos/buscar/equipe?nome=...
        .route("/pilotos/buscar/equipe", get(drivers::find_drivers_by_team))
        // DELETE also removes the driver from every race line-up.
        .route(
            "/pilotos/{id}",
            get(drivers::get_driver)
                .put(drivers::update_driver)
                .delete(drivers::delete_driver),
        )
}
