//! Service layer: reference and uniqueness checks, entity to response mapping.

pub mod championships;
pub mod countries;
pub mod crud;
pub mod drivers;
pub mod races;
pub mod tracks;

pub use championships::ChampionshipService;
pub use countries::CountryService;
pub use drivers::DriverService;
pub use races::RaceService;
pub use tracks::TrackService;
