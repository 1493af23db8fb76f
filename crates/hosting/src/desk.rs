use chrono::DateTime;
use chrono::Utc;
use chrono_tz::Tz;
use duel_bracket::Bracket;
use duel_core::Entrant;
use duel_core::Handle;
use duel_matchroom::*;
use duel_records::*;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

/// Front desk for every match channel.
///
/// Commands for the same channel run one at a time under that channel's
/// lock; different channels never wait on each other. Replies go out
/// through the [`Transport`] only once the transition has committed.
pub struct Desk<R> {
    machine: Machine<R>,
    transport: Arc<dyn Transport>,
    bracket: Arc<dyn Bracket>,
    admins: HashSet<Handle<Member>>,
    locks: RwLock<HashMap<Handle<Channel>, Arc<Mutex<()>>>>,
}

impl<R> Desk<R>
where
    R: MatchRepository,
{
    pub fn new(
        machine: Machine<R>,
        transport: Arc<dyn Transport>,
        bracket: Arc<dyn Bracket>,
        admins: HashSet<Handle<Member>>,
    ) -> Self {
        Self {
            machine,
            transport,
            bracket,
            admins,
            locks: RwLock::new(HashMap::new()),
        }
    }
    pub fn machine(&self) -> &Machine<R> {
        &self.machine
    }
    pub fn is_admin(&self, user: &Handle<Member>) -> bool {
        self.admins.contains(user)
    }

    /// Handles one chat message. Returns the replies that were sent,
    /// which is nothing when the message is not a command.
    pub async fn handle(&self, channel: &Handle<Channel>, author: &Handle<Member>, text: &str) -> Vec<String> {
        let Some((command, args)) = Command::parse(text) else {
            return Vec::new();
        };
        let replies = match self.execute(channel, author, command, &args).await {
            Ok(replies) => replies,
            Err(e) => {
                if let MatchError::StorageFailure(ref cause) = e {
                    log::error!("[desk {}] {:?} from {} failed: {}", channel, command, author, cause);
                }
                vec![e.to_string()]
            }
        };
        self.deliver(channel, &replies).await;
        replies
    }

    /// Round start. Display names come from the bracket.
    pub async fn open(
        &self,
        channel: &Handle<Channel>,
        seats: [(Handle<Member>, Entrant); 2],
    ) -> Result<Vec<String>, MatchError> {
        let [(one, a), (two, b)] = seats;
        let racers = [
            Racer::new(one, self.bracket.name(a).await, a),
            Racer::new(two, self.bracket.name(b).await, b),
        ];
        let replies = render(self.machine.open(channel.clone(), racers).await?);
        self.deliver(channel, &replies).await;
        Ok(replies)
    }

    /// Round end.
    pub async fn close(&self, channel: &Handle<Channel>) -> Result<Vec<String>, MatchError> {
        let lock = self.lock(channel).await?;
        let replies = {
            let _guard = lock.lock().await;
            render(self.machine.close(channel).await?)
        };
        self.deliver(channel, &replies).await;
        self.locks.write().await.remove(channel);
        Ok(replies)
    }

    pub async fn status(&self, channel: &Handle<Channel>) -> Result<Summary, MatchError> {
        self.machine.status(channel).await
    }

    /// Advances every match whose scheduled time or caster window has
    /// passed. Returns how many moved.
    pub async fn sweep(&self, now: DateTime<Utc>, window: Duration) -> Result<usize, MatchError> {
        let mut advanced = 0;
        for channel in self.machine.due(now, window).await? {
            let outcome = match self.lock(&channel).await {
                Ok(lock) => {
                    let _guard = lock.lock().await;
                    self.machine.advance(&channel).await
                }
                Err(e) => Err(e),
            };
            match outcome {
                Ok(events) => {
                    advanced += 1;
                    self.deliver(&channel, &render(events)).await;
                }
                Err(e) => log::debug!("[desk {}] not advanced: {}", channel, e),
            }
        }
        Ok(advanced)
    }

    async fn execute(
        &self,
        channel: &Handle<Channel>,
        author: &Handle<Member>,
        command: Command,
        args: &[&str],
    ) -> Result<Vec<String>, MatchError> {
        if command.is_admin() && !self.is_admin(author) {
            return Err(MatchError::NotAdmin);
        }
        let zone = match command.reads_time() {
            true => self.machine.zone(author).await?,
            false => Tz::UTC,
        };
        match command.request(args, Utc::now(), zone)? {
            Request::Help => Ok(vec![HELP.to_string()]),
            Request::Timezone { user, zone } => {
                let user = user.as_ref().unwrap_or(author);
                let events = match zone {
                    Some(zone) => self.machine.set_timezone(user, zone).await?,
                    None => self.machine.timezone(user).await?,
                };
                Ok(render(events))
            }
            Request::Upcoming { all } => {
                let mut matches = self.machine.upcoming().await?;
                if !all {
                    matches.truncate(1);
                }
                Ok(render(vec![Event::Upcoming {
                    tournament: self.bracket.title().to_string(),
                    matches,
                }]))
            }
            Request::Act { action, stand } => {
                let actor = match stand {
                    None => Actor::racer(author.clone()),
                    Some(stand) => Actor::admin(author.clone(), stand),
                };
                let lock = self.lock(channel).await?;
                let _guard = lock.lock().await;
                Ok(render(self.machine.run(channel, &actor, &action).await?))
            }
        }
    }

    async fn deliver(&self, channel: &Handle<Channel>, replies: &[String]) {
        for reply in replies {
            if let Err(e) = self.transport.send(channel, reply).await {
                log::warn!("[desk {}] {}", channel, MatchError::from(e));
            }
        }
    }

    /// The channel's command lock. Only channels that host a match get one.
    async fn lock(&self, channel: &Handle<Channel>) -> Result<Arc<Mutex<()>>, MatchError> {
        if let Some(lock) = self.locks.read().await.get(channel) {
            return Ok(lock.clone());
        }
        if self.machine.repo().load(channel).await?.is_none() {
            return Err(MatchError::NotAMatchChannel);
        }
        Ok(self
            .locks
            .write()
            .await
            .entry(channel.clone())
            .or_default()
            .clone())
    }
}

fn render(events: Vec<Event>) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Outbox;
    use chrono::TimeZone;
    use duel_bracket::Roster;

    const BRACKET: &str = r#"{
        "tournament": {
            "id": 1,
            "name": "Cup",
            "url": "cup",
            "participants": [
                { "participant": { "id": 10, "name": "Alice", "group_player_ids": [110] } },
                { "participant": { "id": 20, "name": "Bob", "group_player_ids": [] } }
            ]
        }
    }"#;

    fn desk() -> (Desk<Memory>, Arc<Outbox>) {
        let outbox = Arc::new(Outbox::new());
        let bracket = Arc::new(Roster::decode(BRACKET).unwrap());
        let admins = HashSet::from([Handle::from("staff")]);
        let machine = Machine::new(Memory::new(), Rules::default());
        (Desk::new(machine, outbox.clone(), bracket, admins), outbox)
    }

    fn channel() -> Handle<Channel> {
        Handle::from("room")
    }

    async fn opened() -> (Desk<Memory>, Arc<Outbox>) {
        let (desk, outbox) = desk();
        desk.open(&channel(), [(Handle::from("a"), 110), (Handle::from("b"), 20)])
            .await
            .unwrap();
        outbox.drain(&channel()).await;
        (desk, outbox)
    }

    #[tokio::test]
    async fn names_come_from_the_bracket() {
        let (desk, _) = opened().await;
        let summary = desk.status(&channel()).await.unwrap();
        assert_eq!(summary.racers, [String::from("Alice"), String::from("Bob")]);
    }
    #[tokio::test]
    async fn chatter_is_ignored() {
        let (desk, outbox) = opened().await;
        assert!(desk.handle(&channel(), &Handle::from("a"), "gl hf").await.is_empty());
        assert!(desk.handle(&channel(), &Handle::from("a"), "!dance").await.is_empty());
        assert!(outbox.drain(&channel()).await.is_empty());
    }
    #[tokio::test]
    async fn replies_reach_the_transport() {
        let (desk, outbox) = opened().await;
        let replies = desk.handle(&channel(), &Handle::from("a"), "!status").await;
        assert_eq!(replies.len(), 1);
        assert_eq!(outbox.drain(&channel()).await, replies);
    }
    #[tokio::test]
    async fn help_works_anywhere() {
        let (desk, _) = desk();
        let replies = desk.handle(&Handle::from("lobby"), &Handle::from("x"), "!help").await;
        assert_eq!(replies, vec![HELP.to_string()]);
    }
    #[tokio::test]
    async fn admin_commands_are_gated() {
        let (desk, _) = opened().await;
        let replies = desk.handle(&channel(), &Handle::from("a"), "!getstate").await;
        assert_eq!(replies, vec![MatchError::NotAdmin.to_string()]);
        let replies = desk.handle(&channel(), &Handle::from("staff"), "!getstate").await;
        assert!(replies[0].contains("\"phase\""));
    }
    #[tokio::test]
    async fn errors_are_replied() {
        let (desk, _) = opened().await;
        let replies = desk.handle(&channel(), &Handle::from("a"), "!pick 1").await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("draft") || replies[0].contains("pick"));
        let replies = desk.handle(&Handle::from("lobby"), &Handle::from("a"), "!status").await;
        assert_eq!(replies, vec![MatchError::NotAMatchChannel.to_string()]);
    }
    #[tokio::test]
    async fn sweep_opens_the_caster_window_then_the_draft() {
        let (desk, outbox) = opened().await;
        desk.handle(&channel(), &Handle::from("a"), "!time 2099-01-01 18:00").await;
        desk.handle(&channel(), &Handle::from("b"), "!timeok").await;
        outbox.drain(&channel()).await;
        let start = Utc.with_ymd_and_hms(2099, 1, 1, 18, 0, 0).unwrap();
        let window = Duration::from_secs(15 * 60);
        assert_eq!(desk.sweep(start - chrono::Duration::minutes(1), window).await.unwrap(), 0);
        assert_eq!(desk.sweep(start, window).await.unwrap(), 1);
        assert_eq!(desk.status(&channel()).await.unwrap().phase, Phase::CastAssignmentOpen);
        assert_eq!(desk.sweep(start + chrono::Duration::minutes(5), window).await.unwrap(), 0);
        assert_eq!(desk.sweep(start + chrono::Duration::minutes(15), window).await.unwrap(), 1);
        assert_eq!(desk.status(&channel()).await.unwrap().phase, Phase::DraftingCharacters);
        assert!(!outbox.drain(&channel()).await.is_empty());
    }
    #[tokio::test]
    async fn other_channels_get_no_lock() {
        let (desk, _) = opened().await;
        for i in 0..50 {
            let lobby = Handle::from(format!("lobby-{}", i));
            desk.handle(&lobby, &Handle::from("a"), "!status").await;
            desk.handle(&lobby, &Handle::from("a"), "!pick 1").await;
            desk.handle(&lobby, &Handle::from("staff"), "!forcetimeok").await;
        }
        assert!(desk.locks.read().await.is_empty());
        desk.handle(&channel(), &Handle::from("a"), "!status").await;
        assert_eq!(desk.locks.read().await.len(), 1);
    }
    #[tokio::test]
    async fn times_are_read_in_the_authors_zone() {
        let (desk, _) = opened().await;
        let replies = desk.handle(&channel(), &Handle::from("a"), "!timezone Asia/Tokyo").await;
        assert_eq!(replies, vec![String::from("a now reads times in Asia/Tokyo.")]);
        desk.handle(&channel(), &Handle::from("a"), "!time 2099-01-02 09:00").await;
        let summary = desk.status(&channel()).await.unwrap();
        assert_eq!(summary.time, Some(Utc.with_ymd_and_hms(2099, 1, 2, 0, 0, 0).unwrap()));
        let replies = desk.handle(&channel(), &Handle::from("b"), "!gettimezone a").await;
        assert_eq!(replies, vec![String::from("a reads times in Asia/Tokyo.")]);
        let replies = desk.handle(&channel(), &Handle::from("b"), "!timezone").await;
        assert!(replies[0].contains("UTC"));
    }
    #[tokio::test]
    async fn only_admins_set_other_zones() {
        let (desk, _) = opened().await;
        let replies = desk.handle(&channel(), &Handle::from("a"), "!settimezone b Europe/Oslo").await;
        assert_eq!(replies, vec![MatchError::NotAdmin.to_string()]);
        desk.handle(&channel(), &Handle::from("staff"), "!timezoneset b Europe/Oslo").await;
        assert_eq!(desk.machine().zone(&Handle::from("b")).await.unwrap(), Tz::Europe__Oslo);
    }
    #[tokio::test]
    async fn schedule_lists_agreed_matches() {
        let (desk, _) = opened().await;
        let replies = desk.handle(&Handle::from("lobby"), &Handle::from("x"), "!getnext").await;
        assert_eq!(replies, vec![String::from("No matches are scheduled.")]);
        desk.handle(&channel(), &Handle::from("a"), "!time 2099-01-01 18:00").await;
        desk.handle(&channel(), &Handle::from("b"), "!timeok").await;
        let replies = desk.handle(&Handle::from("lobby"), &Handle::from("x"), "!schedule").await;
        assert_eq!(
            replies,
            vec![String::from("Upcoming in Cup:\n- Alice vs. Bob, 2099-01-01 18:00 UTC")]
        );
        assert!(desk.locks.read().await.get(&Handle::from("lobby")).is_none());
    }
    #[tokio::test]
    async fn close_forgets_the_channel() {
        let (desk, outbox) = opened().await;
        desk.close(&channel()).await.unwrap();
        assert_eq!(outbox.drain(&channel()).await.len(), 1);
        assert!(matches!(desk.close(&channel()).await, Err(MatchError::NotAMatchChannel)));
        assert!(desk.locks.read().await.is_empty());
    }
}
