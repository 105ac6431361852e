//! Transport layer: one module of axum handlers per catalog resource.
//!
//! Handlers only decode, delegate to their service and wrap the result. Every
//! failure is an `AppError`, which carries its own status code.

use serde::Deserialize;

pub mod championships;
pub mod countries;
pub mod drivers;
pub mod races;
pub mod tracks;

/// NameFilter
///
/// Query string of the name-based filter endpoints (`?nome=...`). A missing
/// value decodes as blank and is rejected by the service with a field error.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameFilter {
    /// Name to match, case-insensitive and exact.
    #[serde(default)]
    pub nome: String,
}
