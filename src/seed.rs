use crate::{
    error::AppError,
    models::Country,
    repository::{CrudStore, Repository},
};
use uuid::Uuid;

/// Countries every fresh catalog starts with.
pub const DEFAULT_COUNTRIES: [&str; 3] = ["Brasil", "Itália", "Alemanha"];

/// seed_catalog
///
/// Inserts the default countries that are not present yet and returns how many
/// were added. Running it twice adds nothing the second time.
pub async fn seed_catalog(repo: &dyn Repository) -> Result<usize, AppError> {
    let mut inserted = 0;
    for name in DEFAULT_COUNTRIES {
        if repo.find_country_by_name(name).await?.is_some() {
            continue;
        }
        let country = Country {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        CrudStore::<Country>::insert(repo, country).await?;
        inserted += 1;
    }
    tracing::info!(inserted, "catalog seed applied");
    Ok(inserted)
}
