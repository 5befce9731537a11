use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::base::{
    error::StoreResult,
    leaderboard,
    types::{Event, LeaderboardEntry, OverallEntry, PrProgress, PrRecord, Registration, User},
};

pub mod surreal;

// Traits.

/// Generic PR store trait that database backends must implement.
///
/// This trait defines everything the bot persists and queries: members,
/// the fixed event catalog, PR submissions, and the leaderboards derived
/// from them. Every write is committed before the call returns.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Creates the storage structures if absent and seeds the event catalog.
    ///
    /// Safe to call on every start; seeding never duplicates an event.
    async fn initialize(&self) -> StoreResult<()>;

    /// Looks up an event by its exact name.
    async fn lookup_event(&self, name: &str) -> StoreResult<Option<Event>>;

    /// Lists the event catalog, in catalog order.
    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    /// Registers a member, or reports the existing registration untouched.
    async fn register_user(&self, user_id: &str, display_name: &str) -> StoreResult<Registration>;

    /// Looks up a registered member.
    async fn lookup_user(&self, user_id: &str) -> StoreResult<Option<User>>;

    /// Appends a new PR submission stamped with the current time.
    ///
    /// Rejects unregistered members, unknown events, and values that are not
    /// finite numbers. Prior submissions are never touched.
    async fn record_pr(&self, user_id: &str, event_name: &str, value: &str) -> StoreResult<PrRecord>;

    /// Lists a member's submissions for an event, oldest first.
    async fn list_user_prs(&self, user_id: &str, event_name: &str) -> StoreResult<Vec<PrProgress>>;

    /// Ranks each registered member's best submission for an event.
    ///
    /// See [`leaderboard::rank`] for the ordering. Unknown events and events
    /// without submissions yield an empty leaderboard.
    async fn event_leaderboard(&self, event_name: &str) -> StoreResult<Vec<LeaderboardEntry>>;

    /// Ranks members by how many event leaderboards they lead.
    async fn overall_leaderboard(&self) -> StoreResult<Vec<OverallEntry>> {
        let events = self.list_events().await?;
        let boards = try_join_all(events.iter().map(|event| self.event_leaderboard(&event.name))).await?;

        Ok(leaderboard::count_first_places(boards))
    }
}

// Structs.

/// Database client for pr-bot.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    /// The database client instance.
    inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}
