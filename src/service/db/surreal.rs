//! SurrealDB implementation for pr-bot data storage.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, de::DeserializeOwned};
use surrealdb::{
    Surreal,
    engine::any::{self, Any},
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::base::{
    catalog::{EVENT_CATALOG, catalog_position},
    config::Config,
    error::{StoreError, StoreResult},
    leaderboard,
    types::{Event, LeaderboardEntry, PrProgress, PrRecord, Registration, User},
};

use super::{DbClient, GenericDbClient};

/// Tables, fields, and indexes; every statement is a no-op when already defined.
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS users SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS user_id ON users TYPE string;
    DEFINE FIELD IF NOT EXISTS display_name ON users TYPE string;
    DEFINE INDEX IF NOT EXISTS users_user_id ON users FIELDS user_id UNIQUE;

    DEFINE TABLE IF NOT EXISTS events SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS event_name ON events TYPE string;
    DEFINE FIELD IF NOT EXISTS time_based ON events TYPE bool;
    DEFINE INDEX IF NOT EXISTS events_event_name ON events FIELDS event_name UNIQUE;

    DEFINE TABLE IF NOT EXISTS prs SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS seq ON prs TYPE int;
    DEFINE FIELD IF NOT EXISTS user_id ON prs TYPE string;
    DEFINE FIELD IF NOT EXISTS event_name ON prs TYPE string;
    DEFINE FIELD IF NOT EXISTS pr_value ON prs TYPE string;
    DEFINE FIELD IF NOT EXISTS recorded_at ON prs TYPE string;
    DEFINE INDEX IF NOT EXISTS prs_seq ON prs FIELDS seq UNIQUE;
    DEFINE INDEX IF NOT EXISTS prs_user_event ON prs FIELDS user_id, event_name;
"#;

const PR_FIELDS: &str = "seq, user_id, event_name, pr_value, recorded_at";

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Opens the database named in the config and initializes it.
    pub async fn surreal(config: &Config) -> StoreResult<Self> {
        let client = SurrealDbClient::connect(&config.db_endpoint, &config.db_namespace, &config.db_database).await?;
        client.initialize().await?;

        Ok(Self { inner: Arc::new(client) })
    }

    /// Opens a fresh, initialized in-memory database.
    pub async fn surreal_memory() -> StoreResult<Self> {
        let client = SurrealDbClient::connect("mem://", "pr_bot", "test").await?;
        client.initialize().await?;

        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

#[derive(Debug, Deserialize)]
struct SeqRow {
    seq: i64,
}

#[derive(Debug, Deserialize)]
struct ProgressRow {
    pr_value: String,
    recorded_at: String,
}

/// SurrealDB-backed PR store.
///
/// The client handle is safe to share, but registration, seeding, and sequence
/// allocation are read-then-write, so all writes are serialized by `write_lock`.
pub struct SurrealDbClient {
    db: Surreal<Any>,
    write_lock: Mutex<()>,
}

impl SurrealDbClient {
    /// Connects to `endpoint` (e.g., `surrealkv://pr_bot.db` or `mem://`) and selects the namespace and database.
    #[instrument(name = "SurrealDbClient::connect")]
    pub async fn connect(endpoint: &str, namespace: &str, database: &str) -> StoreResult<Self> {
        let db = any::connect(endpoint).await?;
        db.use_ns(namespace).use_db(database).await?;

        info!("Connected to database at `{}`.", endpoint);

        Ok(Self { db, write_lock: Mutex::new(()) })
    }

    /// Runs a single-statement query and returns its rows.
    async fn fetch<T>(&self, sql: &str, binds: Vec<(&'static str, String)>) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut query = self.db.query(sql);
        for bind in binds {
            query = query.bind(bind);
        }

        let mut response = query.await?;
        let rows: Vec<T> = response.take(0)?;

        Ok(rows)
    }

    async fn next_seq(&self) -> StoreResult<i64> {
        let last: Vec<SeqRow> = self.fetch("SELECT seq FROM prs ORDER BY seq DESC LIMIT 1", Vec::new()).await?;

        Ok(last.first().map_or(1, |row| row.seq + 1))
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(skip(self))]
    async fn initialize(&self) -> StoreResult<()> {
        self.db.query(SCHEMA).await?.check()?;

        let _guard = self.write_lock.lock().await;

        for catalog_event in EVENT_CATALOG.iter() {
            if self.lookup_event(catalog_event.name).await?.is_some() {
                continue;
            }

            debug!("Seeding event `{}`.", catalog_event.name);

            self.db.query("CREATE events CONTENT $event").bind(("event", catalog_event.to_event())).await?.check()?;
        }

        info!("Database initialized successfully.");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn lookup_event(&self, name: &str) -> StoreResult<Option<Event>> {
        let events: Vec<Event> = self
            .fetch("SELECT event_name, time_based FROM events WHERE event_name = $name LIMIT 1", vec![("name", name.to_string())])
            .await?;

        Ok(events.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.fetch("SELECT event_name, time_based FROM events", Vec::new()).await?;
        events.sort_by_key(|event| catalog_position(&event.name).unwrap_or(usize::MAX));

        Ok(events)
    }

    #[instrument(skip(self))]
    async fn register_user(&self, user_id: &str, display_name: &str) -> StoreResult<Registration> {
        let _guard = self.write_lock.lock().await;

        if let Some(existing) = self.lookup_user(user_id).await? {
            info!("User `{}` is already registered.", user_id);

            return Ok(Registration::AlreadyRegistered(existing));
        }

        let user = User {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
        };

        self.db.query("CREATE users CONTENT $user").bind(("user", user.clone())).await?.check()?;

        info!("Registered user `{}`.", user_id);

        Ok(Registration::Registered(user))
    }

    #[instrument(skip(self))]
    async fn lookup_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let users: Vec<User> = self
            .fetch("SELECT user_id, display_name FROM users WHERE user_id = $user_id LIMIT 1", vec![("user_id", user_id.to_string())])
            .await?;

        Ok(users.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn record_pr(&self, user_id: &str, event_name: &str, value: &str) -> StoreResult<PrRecord> {
        if leaderboard::parse_value(value).is_none() {
            return Err(StoreError::InvalidValue(value.to_string()));
        }

        let _guard = self.write_lock.lock().await;

        if self.lookup_user(user_id).await?.is_none() {
            return Err(StoreError::UnknownUser(user_id.to_string()));
        }

        if self.lookup_event(event_name).await?.is_none() {
            return Err(StoreError::UnknownEvent(event_name.to_string()));
        }

        let record = PrRecord {
            seq: self.next_seq().await?,
            user_id: user_id.to_string(),
            event_name: event_name.to_string(),
            value: value.to_string(),
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        self.db.query("CREATE prs CONTENT $record").bind(("record", record.clone())).await?.check()?;

        info!("Recorded PR #{} for `{}` in `{}`.", record.seq, user_id, event_name);

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn list_user_prs(&self, user_id: &str, event_name: &str) -> StoreResult<Vec<PrProgress>> {
        let rows: Vec<ProgressRow> = self
            .fetch(
                "SELECT pr_value, recorded_at, seq FROM prs WHERE user_id = $user_id AND event_name = $event_name ORDER BY recorded_at ASC, seq ASC",
                vec![("user_id", user_id.to_string()), ("event_name", event_name.to_string())],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| PrProgress {
                value: row.pr_value,
                recorded_at: row.recorded_at,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn event_leaderboard(&self, event_name: &str) -> StoreResult<Vec<LeaderboardEntry>> {
        let Some(event) = self.lookup_event(event_name).await? else {
            warn!("Leaderboard requested for unknown event `{}`.", event_name);
            return Ok(Vec::new());
        };

        let records: Vec<PrRecord> = self
            .fetch(&format!("SELECT {PR_FIELDS} FROM prs WHERE event_name = $event_name"), vec![("event_name", event_name.to_string())])
            .await?;

        let ranked = leaderboard::rank(event.orientation(), records);
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        // Join against registered users; records without one are dropped.

        let mut query = self.db.query("SELECT user_id, display_name FROM users WHERE user_id IN $ids");
        query = query.bind(("ids", ranked.iter().map(|r| r.user_id.clone()).collect::<Vec<_>>()));
        let users: Vec<User> = query.await?.take(0)?;

        let names: HashMap<String, String> = users.into_iter().map(|u| (u.user_id, u.display_name)).collect();

        Ok(ranked
            .into_iter()
            .filter_map(|record| {
                let display_name = names.get(&record.user_id)?.clone();

                Some(LeaderboardEntry {
                    display_name,
                    best_value: record.value,
                    user_id: record.user_id,
                    recorded_at: record.recorded_at,
                })
            })
            .collect())
    }
}

// Tests.
