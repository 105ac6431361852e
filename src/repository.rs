use crate::{
    error::{AppError, classify_db_error},
    models::{Championship, Country, Difficulty, Driver, Race, Track},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, postgres::PgRow, query_builder::QueryBuilder};
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

/// Record
///
/// A stored catalog entry: something with an immutable identifier and a
/// human-readable kind used in not-found messages.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

impl Record for Country {
    const KIND: &'static str = "country";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Track {
    const KIND: &'static str = "track";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Driver {
    const KIND: &'static str = "driver";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Race {
    const KIND: &'static str = "race";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Championship {
    const KIND: &'static str = "championship";
    fn id(&self) -> Uuid {
        self.id
    }
}

/// CrudStore
///
/// The storage half of the generic CRUD contract, implemented once per record type.
/// Absence is reported as `None`/`false`; turning it into a not-found error is the
/// caller's job.
#[async_trait]
pub trait CrudStore<T: Record>: Send + Sync {
    async fn insert(&self, record: T) -> Result<T, AppError>;
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<T>, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<T>, AppError>;
    /// Records whose id is in `ids`; unknown ids are skipped.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, AppError>;
    /// Full replace keyed by `record.id()`. `None` when no row had that id.
    async fn replace(&self, record: T) -> Result<Option<T>, AppError>;
    /// `false` when no row had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Repository Trait
///
/// Everything the services need from persistence: the five CRUD stores plus the
/// resource-specific filtered lookups. Name filters are case-insensitive exact
/// matches; callers pass already-trimmed values.
#[async_trait]
pub trait Repository:
    CrudStore<Country>
    + CrudStore<Track>
    + CrudStore<Driver>
    + CrudStore<Race>
    + CrudStore<Championship>
    + Send
    + Sync
{
    async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>, AppError>;
    async fn find_tracks_by_country_name(&self, name: &str) -> Result<Vec<Track>, AppError>;
    async fn find_tracks_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Track>, AppError>;
    async fn find_drivers_by_team(&self, team: &str) -> Result<Vec<Driver>, AppError>;
    /// Races in which a driver with this name participates.
    async fn find_races_by_driver_name(&self, name: &str) -> Result<Vec<Race>, AppError>;
    /// Races held on a track located in the named country.
    async fn find_races_by_country_name(&self, name: &str) -> Result<Vec<Race>, AppError>;
    async fn find_championships_by_team(&self, team: &str) -> Result<Vec<Championship>, AppError>;
    /// Number of races attached to each championship. Championships without races are absent.
    async fn count_races_by_championship(
        &self,
        championship_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// --- Postgres Column Mapping ---

/// A bindable column value. Lets the generic CRUD statements bind heterogeneous
/// columns without knowing the record type.
#[derive(Debug, Clone)]
pub enum PgValue {
    Text(String),
    Int(i32),
    Uuid(Uuid),
    OptionalUuid(Option<Uuid>),
    Date(NaiveDate),
    Difficulty(Difficulty),
    UuidArray(Vec<Uuid>),
    TextArray(Vec<String>),
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: PgValue) {
    match value {
        PgValue::Text(v) => builder.push_bind(v),
        PgValue::Int(v) => builder.push_bind(v),
        PgValue::Uuid(v) => builder.push_bind(v),
        PgValue::OptionalUuid(v) => builder.push_bind(v),
        PgValue::Date(v) => builder.push_bind(v),
        PgValue::Difficulty(v) => builder.push_bind(v),
        PgValue::UuidArray(v) => builder.push_bind(v),
        PgValue::TextArray(v) => builder.push_bind(v),
    };
}

/// PgRecord
///
/// Table layout of a record type. `COLUMNS` excludes `id` and must line up with
/// the order of `values()`.
pub trait PgRecord: Record + for<'r> sqlx::FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<PgValue>;

    /// Statement deleting the row bound to `$1`.
    fn delete_sql() -> String {
        format!("DELETE FROM {} WHERE id = $1", Self::TABLE)
    }

    fn select_list() -> String {
        format!("id, {}", Self::COLUMNS.join(", "))
    }
}

impl PgRecord for Country {
    const TABLE: &'static str = "countries";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn values(&self) -> Vec<PgValue> {
        vec![PgValue::Text(self.name.clone())]
    }
}

impl PgRecord for Track {
    const TABLE: &'static str = "tracks";
    const COLUMNS: &'static [&'static str] = &["name", "country_id", "difficulty"];

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::Text(self.name.clone()),
            PgValue::Uuid(self.country_id),
            PgValue::Difficulty(self.difficulty),
        ]
    }
}

impl PgRecord for Driver {
    const TABLE: &'static str = "drivers";
    const COLUMNS: &'static [&'static str] = &["name", "team"];

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::Text(self.name.clone()),
            PgValue::Text(self.team.clone()),
        ]
    }

    /// Drops the driver from every race's participant set in the same statement.
    fn delete_sql() -> String {
        r#"
        WITH detached AS (
            UPDATE races SET driver_ids = array_remove(driver_ids, $1)
            WHERE $1 = ANY(driver_ids)
        )
        DELETE FROM drivers WHERE id = $1
        "#
        .to_string()
    }
}

impl PgRecord for Race {
    const TABLE: &'static str = "races";
    const COLUMNS: &'static [&'static str] =
        &["name", "date", "track_id", "championship_id", "driver_ids"];

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::Text(self.name.clone()),
            PgValue::Date(self.date),
            PgValue::Uuid(self.track_id),
            PgValue::OptionalUuid(self.championship_id),
            PgValue::UuidArray(self.driver_ids.clone()),
        ]
    }
}

impl PgRecord for Championship {
    const TABLE: &'static str = "championships";
    const COLUMNS: &'static [&'static str] = &["name", "season", "teams"];

    fn values(&self) -> Vec<PgValue> {
        vec![
            PgValue::Text(self.name.clone()),
            PgValue::Int(self.season),
            PgValue::TextArray(self.teams.clone()),
        ]
    }
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Statements are built at runtime with `QueryBuilder` and bound parameters, so
/// the crate compiles without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl<T: PgRecord> CrudStore<T> for PostgresRepository {
    async fn insert(&self, record: T) -> Result<T, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} (id, {}) VALUES (",
            T::TABLE,
            T::COLUMNS.join(", ")
        ));
        builder.push_bind(record.id());
        for value in record.values() {
            builder.push(", ");
            push_value(&mut builder, value);
        }
        builder.push(format!(") RETURNING {}", T::select_list()));

        builder
            .build_query_as::<T>()
            .fetch_one(&self.pool)
            .await
            .map_err(classify_db_error)
    }

    async fn list(&self) -> Result<Vec<T>, AppError> {
        let sql = format!("SELECT {} FROM {} ORDER BY seq", T::select_list(), T::TABLE);
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", T::select_list(), T::TABLE);
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ANY($1) ORDER BY seq",
            T::select_list(),
            T::TABLE
        );
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn replace(&self, record: T) -> Result<Option<T>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", T::TABLE));
        for (i, (column, value)) in T::COLUMNS.iter().zip(record.values()).enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(format!("{} = ", column));
            push_value(&mut builder, value);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(record.id());
        builder.push(format!(" RETURNING {}", T::select_list()));

        builder
            .build_query_as::<T>()
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_db_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let sql = T::delete_sql();
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>, AppError> {
        Ok(sqlx::query_as::<_, Country>(
            "SELECT id, name FROM countries WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_tracks_by_country_name(&self, name: &str) -> Result<Vec<Track>, AppError> {
        Ok(sqlx::query_as::<_, Track>(
            r#"
            SELECT t.id, t.name, t.country_id, t.difficulty
            FROM tracks t
            JOIN countries c ON c.id = t.country_id
            WHERE LOWER(c.name) = LOWER($1)
            ORDER BY t.seq
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_tracks_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Track>, AppError> {
        Ok(sqlx::query_as::<_, Track>(
            "SELECT id, name, country_id, difficulty FROM tracks WHERE difficulty = $1 ORDER BY seq",
        )
        .bind(difficulty)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_drivers_by_team(&self, team: &str) -> Result<Vec<Driver>, AppError> {
        Ok(sqlx::query_as::<_, Driver>(
            "SELECT id, name, team FROM drivers WHERE LOWER(team) = LOWER($1) ORDER BY seq",
        )
        .bind(team)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_races_by_driver_name(&self, name: &str) -> Result<Vec<Race>, AppError> {
        Ok(sqlx::query_as::<_, Race>(
            r#"
            SELECT r.id, r.name, r.date, r.track_id, r.championship_id, r.driver_ids
            FROM races r
            WHERE EXISTS (
                SELECT 1 FROM drivers d
                WHERE d.id = ANY(r.driver_ids) AND LOWER(d.name) = LOWER($1)
            )
            ORDER BY r.seq
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_races_by_country_name(&self, name: &str) -> Result<Vec<Race>, AppError> {
        Ok(sqlx::query_as::<_, Race>(
            r#"
            SELECT r.id, r.name, r.date, r.track_id, r.championship_id, r.driver_ids
            FROM races r
            JOIN tracks t ON t.id = r.track_id
            JOIN countries c ON c.id = t.country_id
            WHERE LOWER(c.name) = LOWER($1)
            ORDER BY r.seq
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_championships_by_team(&self, team: &str) -> Result<Vec<Championship>, AppError> {
        Ok(sqlx::query_as::<_, Championship>(
            r#"
            SELECT id, name, season, teams
            FROM championships
            WHERE EXISTS (SELECT 1 FROM unnest(teams) AS team WHERE LOWER(team) = LOWER($1))
            ORDER BY seq
            "#,
        )
        .bind(team)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_races_by_championship(
        &self,
        championship_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, AppError> {
        if championship_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT championship_id, COUNT(*)
            FROM races
            WHERE championship_id = ANY($1)
            GROUP BY championship_id
            "#,
        )
        .bind(championship_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
