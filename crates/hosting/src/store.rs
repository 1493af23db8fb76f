use chrono::DateTime;
use chrono::Utc;
use chrono_tz::Tz;
use duel_core::Handle;
use duel_core::Revision;
use duel_matchroom::*;
use duel_records::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_postgres::Client;

/// The storage the process was started with.
pub enum Store {
    Postgres(Arc<Client>),
    Memory(Memory),
}

impl Store {
    /// Connects and migrates, or falls back to memory when no URL is given.
    pub async fn connect(url: Option<&str>) -> anyhow::Result<Self> {
        match url {
            Some(url) => {
                let client = duel_pg::db(url).await?;
                duel_matchroom::migrate(&client).await?;
                Ok(Self::Postgres(client))
            }
            None => {
                log::warn!("[store] no database configured, matches live in memory");
                Ok(Self::Memory(Memory::new()))
            }
        }
    }
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(client) => client.execute("SELECT 1", &[]).await.map(|_| ()).map_err(StoreError::from),
            Self::Memory(_) => Ok(()),
        }
    }
}

impl MatchRepository for Store {
    async fn load(&self, channel: &Handle<Channel>) -> Result<Option<Match>, StoreError> {
        match self {
            Self::Postgres(client) => client.load(channel).await,
            Self::Memory(memory) => memory.load(channel).await,
        }
    }
    async fn create(&self, record: &Match) -> Result<(), StoreError> {
        match self {
            Self::Postgres(client) => client.create(record).await,
            Self::Memory(memory) => memory.create(record).await,
        }
    }
    async fn delete(&self, channel: &Handle<Channel>) -> Result<bool, StoreError> {
        match self {
            Self::Postgres(client) => client.delete(channel).await,
            Self::Memory(memory) => memory.delete(channel).await,
        }
    }
    async fn commit(&self, record: &Match) -> Result<Revision, StoreError> {
        match self {
            Self::Postgres(client) => client.commit(record).await,
            Self::Memory(memory) => memory.commit(record).await,
        }
    }
    async fn due(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<Handle<Channel>>, StoreError> {
        match self {
            Self::Postgres(client) => client.due(now, window).await,
            Self::Memory(memory) => memory.due(now, window).await,
        }
    }
    async fn preference(&self, user: &Handle<Member>) -> Result<Preference, StoreError> {
        match self {
            Self::Postgres(client) => client.preference(user).await,
            Self::Memory(memory) => memory.preference(user).await,
        }
    }
    async fn set_preference(&self, user: &Handle<Member>, preference: Preference) -> Result<(), StoreError> {
        match self {
            Self::Postgres(client) => client.set_preference(user, preference).await,
            Self::Memory(memory) => memory.set_preference(user, preference).await,
        }
    }
    async fn upcoming(&self) -> Result<Vec<Match>, StoreError> {
        match self {
            Self::Postgres(client) => client.upcoming().await,
            Self::Memory(memory) => memory.upcoming().await,
        }
    }
    async fn timezone(&self, user: &Handle<Member>) -> Result<Option<Tz>, StoreError> {
        match self {
            Self::Postgres(client) => client.timezone(user).await,
            Self::Memory(memory) => memory.timezone(user).await,
        }
    }
    async fn set_timezone(&self, user: &Handle<Member>, zone: Tz) -> Result<(), StoreError> {
        match self {
            Self::Postgres(client) => client.set_timezone(user, zone).await,
            Self::Memory(memory) => memory.set_timezone(user, zone).await,
        }
    }
}
