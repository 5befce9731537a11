use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Which direction of a measurement counts as "better" for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Timed events: the smallest value wins.
    LowerIsBetter,
    /// Reps, holds, and lifts: the largest value wins.
    HigherIsBetter,
}

impl Orientation {
    /// Orders two values so that the better one comes first.
    pub fn compare(self, a: f64, b: f64) -> std::cmp::Ordering {
        match self {
            Orientation::LowerIsBetter => a.total_cmp(&b),
            Orientation::HigherIsBetter => b.total_cmp(&a),
        }
    }
}

/// A registered community member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque external identity (e.g., the chat platform's user ID).
    pub user_id: String,
    /// Name shown on leaderboards.
    pub display_name: String,
}

/// An event from the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event_name")]
    pub name: String,
    pub time_based: bool,
}

impl Event {
    pub fn orientation(&self) -> Orientation {
        if self.time_based { Orientation::LowerIsBetter } else { Orientation::HigherIsBetter }
    }
}

/// A single, immutable PR submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrRecord {
    /// Auto-assigned sequence number, starting at 1.
    pub seq: i64,
    pub user_id: String,
    pub event_name: String,
    /// The value exactly as submitted.
    #[serde(rename = "pr_value")]
    pub value: String,
    /// UTC RFC 3339 timestamp with fixed precision; sorts lexically.
    pub recorded_at: String,
}

/// One row of a member's progress in an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrProgress {
    pub value: String,
    pub recorded_at: String,
}

/// One row of an event leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub best_value: String,
    pub user_id: String,
    /// When the best value was recorded.
    pub recorded_at: String,
}

/// One row of the overall leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverallEntry {
    pub display_name: String,
    pub user_id: String,
    /// Number of events this member currently leads.
    pub first_places: usize,
}

/// The outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered(User),
    /// The ID was already taken; carries the existing, untouched user.
    AlreadyRegistered(User),
}

/// The member who issued a chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub user_id: String,
    /// How the member is referred to in replies and on leaderboards.
    pub mention: String,
}

/// Who can see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only the member who issued the command.
    Ephemeral,
    /// Everyone in the channel.
    Public,
}

/// A message produced in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub visibility: Visibility,
}

impl Reply {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Ephemeral,
        }
    }

    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Public,
        }
    }
}
