//! Reads from the record store.
//!
//! The hosted database owns the schema and every write; this server only ever reads orders and
//! profiles.

use serde_json::Value;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};

/// Opens the SQLx database pool.
///
/// The pool connects lazily, so an unreachable database surfaces as query errors rather than a
/// startup failure.
///
/// # Errors
///
/// Returns an error if the database URL can't be parsed.
pub fn connect(db_url: &str) -> sqlx::Result<PgPool> {
    PgPoolOptions::new().connect_lazy(db_url)
}

/// Runs the bundled migrations, creating the tables this server reads if they don't exist.
///
/// Only meant for local and test databases. The hosted database manages its own schema.
///
/// # Errors
///
/// Returns an error if connecting or migrating fails.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Fetches the order with the specified token as a JSON object of all its columns.
///
/// Returns `None` unless exactly one order matches.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn find_order(pool: &PgPool, token: &str) -> sqlx::Result<Option<Value>> {
    let mut orders = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(orders) FROM orders
            WHERE token = $1
            LIMIT 2",
    )
    .bind(token)
    .fetch_all(pool)
    .await?;

    if orders.len() != 1 {
        return Ok(None);
    }

    Ok(orders.pop())
}

/// Fetches the raw role of the user with the specified ID from their profile. Returns `None` if
/// the user has no profile or the profile has no role.
///
/// # Errors
///
/// Returns an error if the query fails, including when `user_id` isn't a valid UUID.
pub async fn find_profile_role(pool: &PgPool, user_id: &str) -> sqlx::Result<Option<String>> {
    let role = sqlx::query_scalar::<_, Option<String>>(
        "SELECT role FROM profiles
            WHERE id = $1::uuid",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(role.flatten())
}
