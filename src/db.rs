//! Database pool construction and constraint-violation mapping.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::exception::{Error, Result};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connect a pool and verify connectivity.
pub async fn connect(database_url: &str) -> Result<PgPool> {
	PgPoolOptions::new()
		.max_connections(10)
		.connect(database_url)
		.await
		.map_err(Error::from)
}

/// Build a pool without opening a connection. Used by unit tests and by
/// callers that want to defer connectivity errors to the first query.
pub fn lazy_pool(database_url: &str) -> Result<PgPool> {
	PgPoolOptions::new()
		.max_connections(10)
		.connect_lazy(database_url)
		.map_err(Error::from)
}

/// Apply pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
	MIGRATOR
		.run(pool)
		.await
		.map_err(|e| Error::Internal(format!("migration failed: {e}")))
}

/// The constraint name of a unique violation (SQLSTATE 23505), if `error`
/// is one. Write paths translate these into field-level error shapes
/// instead of letting them surface as server errors.
pub fn unique_violation(error: &sqlx::Error) -> Option<String> {
	if let sqlx::Error::Database(db_error) = error
		&& db_error.code().as_deref() == Some("23505")
	{
		return db_error.constraint().map(str::to_string);
	}
	None
}
