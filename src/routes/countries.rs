use crate::{AppState, handlers::countries};
use axum::{Router, routing::get};

/// Country Router
///
/// `/paises/buscar` is a static segment, so the router matches it before the
/// `{id}` capture.
pub fn country_routes() -> Router<AppState> {
    Router::new()
        // GET /paises lists in insertion order, POST /paises registers a country.
        .route(
            "/paises",
            get(countries::list_countries).post(countries::create_country),
        )
        // GET /paises/buscar?nome=...
        // Single country by name, 404 when none matches.
        .route("/paises/buscar", get(countries::find_country_by_name))
        // GET, PUT and DELETE /paises/{id}
        // DELETE is refused with 409 while a track still points at the country.
        .route(
            "/paises/{id}",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
}
