//! PostgreSQL integration for duelbot.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from `DB_URL`
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//! - [`migrate()`] — Creates every table described by a [`Schema`]
//!
//! ## Table Names
//!
//! Constants for all persistent entities: matches and caster preferences.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the given URL (normally `DB_URL`).
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(Arc::new(client))
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for match records, one row per bound channel.
#[rustfmt::skip]
pub const MATCHES:     &str = "matches";
/// Table for standing caster approval preferences, one row per user.
#[rustfmt::skip]
pub const PREFERENCES: &str = "preferences";
