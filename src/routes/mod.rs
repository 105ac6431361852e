/// Router Module Index
///
/// One router per catalog resource. Each exposes the five CRUD endpoints under
/// its collection path plus the resource's `/buscar` filters, and every module
/// returns a `Router<AppState>` merged by `create_router`.

/// `/paises`
pub mod countries;

/// `/pistas`
pub mod tracks;

/// `/pilotos`
pub mod drivers;

/// `/corridas`
pub mod races;

/// `/campeonatos`
pub mod championships;
