use super::PgErr;
use tokio_postgres::Client;

/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str` so statements can be assembled at
/// compile time with `const_format::concatcp!`.
///
/// This trait contains no I/O operations; it purely describes table
/// structure. Reads and writes live in the repositories that own them.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Creates the table and its indices if they do not exist yet.
pub async fn migrate<S>(client: &Client) -> Result<(), PgErr>
where
    S: Schema,
{
    log::info!("creating table ({})", S::name());
    client.batch_execute(S::creates()).await?;
    if !S::indices().is_empty() {
        log::info!("indexing table ({})", S::name());
        client.batch_execute(S::indices()).await?;
    }
    Ok(())
}
