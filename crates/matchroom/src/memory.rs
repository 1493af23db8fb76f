use super::*;
use chrono::DateTime;
use chrono::Utc;
use chrono_tz::Tz;
use duel_core::Handle;
use duel_core::Revision;
use duel_records::*;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory repository for tests and for running without Postgres.
/// Same compare-and-swap semantics as the database.
#[derive(Debug, Default)]
pub struct Memory {
    matches: RwLock<HashMap<Handle<Channel>, Match>>,
    preferences: RwLock<HashMap<Handle<Member>, Preference>>,
    zones: RwLock<HashMap<Handle<Member>, Tz>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchRepository for Memory {
    async fn load(&self, channel: &Handle<Channel>) -> Result<Option<Match>, StoreError> {
        Ok(self.matches.read().await.get(channel).cloned())
    }
    async fn create(&self, record: &Match) -> Result<(), StoreError> {
        let mut matches = self.matches.write().await;
        if matches.contains_key(record.channel()) {
            return Err(StoreError::Conflict);
        }
        matches.insert(record.channel().clone(), record.clone());
        Ok(())
    }
    async fn delete(&self, channel: &Handle<Channel>) -> Result<bool, StoreError> {
        Ok(self.matches.write().await.remove(channel).is_some())
    }
    async fn commit(&self, record: &Match) -> Result<Revision, StoreError> {
        let mut matches = self.matches.write().await;
        let stored = matches
            .get_mut(record.channel())
            .filter(|stored| stored.revision() == record.revision())
            .ok_or(StoreError::Conflict)?;
        let revision = record.revision() + 1;
        *stored = record.clone();
        stored.set_revision(revision);
        Ok(revision)
    }
    async fn due(&self, now: DateTime<Utc>, window: Duration) -> Result<Vec<Handle<Channel>>, StoreError> {
        let opened = window_start(now, window);
        let matches = self.matches.read().await;
        let mut due = matches
            .values()
            .filter_map(|record| {
                let time = record.schedule()?.time;
                match record.phase() {
                    Phase::Scheduled if time <= now => Some((time, record.channel().clone())),
                    Phase::CastAssignmentOpen if time <= opened => {
                        Some((time, record.channel().clone()))
                    }
                    _ => None,
                }
            })
            .collect::<Vec<_>>();
        due.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(due.into_iter().map(|(_, channel)| channel).collect())
    }
    async fn upcoming(&self) -> Result<Vec<Match>, StoreError> {
        let mut upcoming = self
            .matches
            .read()
            .await
            .values()
            .filter(|record| matches!(record.phase(), Phase::Scheduled | Phase::CastAssignmentOpen))
            .filter(|record| record.schedule().is_some())
            .cloned()
            .collect::<Vec<_>>();
        upcoming.sort_by_key(|record| record.schedule().map(|p| p.time));
        Ok(upcoming)
    }
    async fn preference(&self, user: &Handle<Member>) -> Result<Preference, StoreError> {
        Ok(self
            .preferences
            .read()
            .await
            .get(user)
            .copied()
            .unwrap_or_default())
    }
    async fn set_preference(&self, user: &Handle<Member>, preference: Preference) -> Result<(), StoreError> {
        self.preferences.write().await.insert(user.clone(), preference);
        Ok(())
    }
    async fn timezone(&self, user: &Handle<Member>) -> Result<Option<Tz>, StoreError> {
        Ok(self.zones.read().await.get(user).copied())
    }
    async fn set_timezone(&self, user: &Handle<Member>, zone: Tz) -> Result<(), StoreError> {
        self.zones.write().await.insert(user.clone(), zone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(channel: &str) -> Match {
        let racers = [Racer::new("u1", "one", 1), Racer::new("u2", "two", 2)];
        Match::open(Handle::from(channel), racers, &Rules::default()).unwrap()
    }

    #[tokio::test]
    async fn stale_commit_conflicts() {
        let memory = Memory::new();
        let original = record("c");
        memory.create(&original).await.unwrap();
        let mut first = original.clone();
        first.set_phase(Phase::Scheduled);
        assert_eq!(memory.commit(&first).await.unwrap(), 1);
        let mut second = original.clone();
        second.set_phase(Phase::Completed);
        assert!(matches!(memory.commit(&second).await, Err(StoreError::Conflict)));
        let stored = memory.load(&Handle::from("c")).await.unwrap().unwrap();
        assert_eq!(stored.phase(), Phase::Scheduled);
        assert_eq!(stored.revision(), 1);
    }
    #[tokio::test]
    async fn one_record_per_channel() {
        let memory = Memory::new();
        memory.create(&record("c")).await.unwrap();
        assert!(matches!(memory.create(&record("c")).await, Err(StoreError::Conflict)));
        assert!(memory.delete(&Handle::from("c")).await.unwrap());
        assert!(!memory.delete(&Handle::from("c")).await.unwrap());
        assert!(memory.load(&Handle::from("c")).await.unwrap().is_none());
    }
    #[tokio::test]
    async fn due_respects_phase_and_window() {
        let memory = Memory::new();
        let at = |h| Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap();
        let mut scheduled = record("scheduled");
        scheduled.set_schedule(Some(Proposal::new(at(10), Seat::One)));
        scheduled.set_phase(Phase::Scheduled);
        let mut window = record("window");
        window.set_schedule(Some(Proposal::new(at(9), Seat::One)));
        window.set_phase(Phase::CastAssignmentOpen);
        let mut pending = record("pending");
        pending.set_schedule(Some(Proposal::new(at(8), Seat::One)));
        for r in [&scheduled, &window, &pending] {
            memory.create(r).await.unwrap();
        }
        let hour = Duration::from_secs(3600);
        let due = memory.due(at(10), hour).await.unwrap();
        assert_eq!(due, vec![Handle::from("window"), Handle::from("scheduled")]);
        let due = memory.due(at(9), hour).await.unwrap();
        assert!(due.is_empty());
    }
    #[tokio::test]
    async fn preferences_default_to_ask() {
        let memory = Memory::new();
        let user = Handle::from("u1");
        assert_eq!(memory.preference(&user).await.unwrap(), Preference::Ask);
        memory.set_preference(&user, Preference::AlwaysReject).await.unwrap();
        assert_eq!(memory.preference(&user).await.unwrap(), Preference::AlwaysReject);
    }
    #[tokio::test]
    async fn upcoming_lists_agreed_matches_soonest_first() {
        let memory = Memory::new();
        let at = |h| Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap();
        let mut late = record("late");
        late.set_schedule(Some(Proposal::new(at(20), Seat::One)));
        late.set_phase(Phase::Scheduled);
        let mut soon = record("soon");
        soon.set_schedule(Some(Proposal::new(at(9), Seat::Two)));
        soon.set_phase(Phase::CastAssignmentOpen);
        let mut proposed = record("proposed");
        proposed.set_schedule(Some(Proposal::new(at(8), Seat::One)));
        let mut started = record("started");
        started.set_schedule(Some(Proposal::new(at(7), Seat::One)));
        started.set_phase(Phase::DraftingCharacters);
        for r in [&late, &soon, &proposed, &started] {
            memory.create(r).await.unwrap();
        }
        let channels = memory
            .upcoming()
            .await
            .unwrap()
            .iter()
            .map(|r| r.channel().to_string())
            .collect::<Vec<_>>();
        assert_eq!(channels, vec!["soon", "late"]);
    }
    #[tokio::test]
    async fn timezones_are_kept_per_member() {
        let memory = Memory::new();
        let user = Handle::from("u1");
        assert_eq!(memory.timezone(&user).await.unwrap(), None);
        memory.set_timezone(&user, Tz::Europe__Berlin).await.unwrap();
        memory.set_preference(&user, Preference::AlwaysApprove).await.unwrap();
        assert_eq!(memory.timezone(&user).await.unwrap(), Some(Tz::Europe__Berlin));
        assert_eq!(memory.timezone(&Handle::from("u2")).await.unwrap(), None);
    }
}
