//! Core identity types, draft constants, and runtime helpers for duelbot.
//!
//! Everything here is shared by every other crate in the workspace:
//! typed identifiers for our own entities, typed handles for entities
//! owned by the chat platform, and the default tournament rules.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Count of drafted items, bans, vetos, and reported wins.
pub type Count = u8;
/// Participant id assigned by the bracket provider.
pub type Entrant = i64;
/// Optimistic concurrency token of a persisted match.
pub type Revision = i64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
/// Used for entities we mint ourselves.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.inner, serializer)
    }
}

/// Opaque reference to an entity owned by the chat platform
/// (a channel, a user). The platform mints these as strings; we only
/// compare and store them, so the marker keeps channels and users apart.
pub struct Handle<T> {
    inner: String,
    marker: PhantomData<T>,
}

impl<T> Handle<T> {
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl<T> From<String> for Handle<T> {
    fn from(inner: String) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> From<&str> for Handle<T> {
    fn from(inner: &str) -> Self {
        Self::from(inner.to_string())
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self::from(self.inner.clone())
    }
}

impl<T> Eq for Handle<T> {}
impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handle").field(&self.inner).finish()
    }
}
impl<T> Display for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl<T> serde::Serialize for Handle<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.inner)
    }
}
impl<'de, T> serde::Deserialize<'de> for Handle<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// TOURNAMENT RULES
// ============================================================================
/// Participants per match.
pub const N: usize = 2;
/// Items chosen per kind unless the tournament says otherwise. Always odd.
pub const BEST_OF: Count = 3;
/// Vetos each participant may spend over the whole match.
pub const VETOS: Count = 1;
/// Bans each participant makes before the picks of every kind.
pub const BANS: Count = 1;

/// Default character pool.
#[rustfmt::skip]
pub const CHARACTERS: &[&str] = &[
    "Isaac", "Magdalene", "Cain", "Judas", "Blue Baby",
    "Eve", "Samson", "Azazel", "Lazarus", "Eden",
    "The Lost", "Lilith", "Keeper", "Apollyon", "The Forgotten",
];
/// Default build pool.
#[rustfmt::skip]
pub const BUILDS: &[&str] = &[
    "20/20", "Chocolate Milk", "Cricket's Body", "Dead Eye", "Death's Touch",
    "Dr. Fetus", "Epic Fetus", "Ipecac", "Judas' Shadow", "Lil Brimstone",
    "Mom's Knife", "Monstro's Lung", "Polyphemus", "Proptosis", "Sacrificial Dagger",
    "Tech.5", "Tech X", "Brimstone", "Incubus", "Maw of the Void",
    "Crown of Light", "Godhead", "Sacred Heart",
];

// ============================================================================
// RUNTIME TUNING
// ============================================================================
/// How many times a command is re-run after losing a commit race.
pub const COMMIT_RETRIES: usize = 3;
/// How long the caster window stays open before the draft is started.
pub const CAST_WINDOW: std::time::Duration = std::time::Duration::from_secs(15 * 60);
/// Interval between sweeps for matches whose scheduled time has arrived.
pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
/// Command prefix recognised in chat messages.
pub const PREFIX: char = '!';

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate termination.
/// Every command commits atomically, so there is nothing to drain.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
pub fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}
