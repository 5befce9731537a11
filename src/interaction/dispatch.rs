//! Executes chat commands against the store and builds the replies.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        error::StoreError,
        types::{Invoker, Registration, Reply, Res},
    },
    interaction::{command::Command, format},
    service::{chat::ChatClient, db::DbClient},
};

/// Parses and executes a raw command, turning parse errors into a usage reply.
#[instrument(skip(invoker, db, chat, registration_role))]
pub async fn handle_raw_command(name: &str, args: &str, invoker: &Invoker, db: &DbClient, chat: &ChatClient, registration_role: &str) -> Res<Vec<Reply>> {
    match Command::parse(name, args) {
        Ok(command) => handle_command(command, invoker, db, chat, registration_role).await,
        Err(err) => {
            warn!("Rejected command: {}", err);
            Ok(vec![Reply::ephemeral(err.to_string())])
        }
    }
}

/// Executes a parsed command.
///
/// Conditions the member can fix (missing registration, unknown event, bad
/// value) become replies; storage failures are returned as errors.
#[instrument(skip(invoker, db, chat, registration_role), fields(user_id = %invoker.user_id))]
pub async fn handle_command(command: Command, invoker: &Invoker, db: &DbClient, chat: &ChatClient, registration_role: &str) -> Res<Vec<Reply>> {
    match command {
        Command::Register => register(invoker, db, chat, registration_role).await,
        Command::Pr { event, value } => record_pr(invoker, db, &event, &value).await,
        Command::Progress { event } => progress(invoker, db, &event).await,
        Command::Leaderboard { event } => leaderboard(db, &event).await,
        Command::Best => best(db).await,
        Command::Events => Ok(vec![Reply::ephemeral(format::events(&db.list_events().await?))]),
    }
}

async fn register(invoker: &Invoker, db: &DbClient, chat: &ChatClient, registration_role: &str) -> Res<Vec<Reply>> {
    let roles = chat.member_roles(&invoker.user_id).await?;

    if !roles.iter().any(|role| role == registration_role) {
        info!("Registration refused: missing role `{}`.", registration_role);
        return Ok(vec![Reply::ephemeral("You don't have the required role to register.")]);
    }

    let text = match db.register_user(&invoker.user_id, &invoker.mention).await? {
        Registration::Registered(_) => format!("{}, you have been registered.", invoker.mention),
        Registration::AlreadyRegistered(_) => format!("{}, you are already registered.", invoker.mention),
    };

    Ok(vec![Reply::ephemeral(text)])
}

async fn record_pr(invoker: &Invoker, db: &DbClient, event: &str, value: &str) -> Res<Vec<Reply>> {
    if let Some(reply) = require_registered_and_event(invoker, db, event).await? {
        return Ok(vec![reply]);
    }

    match db.record_pr(&invoker.user_id, event, value).await {
        Ok(_) => {}
        Err(StoreError::InvalidValue(value)) => {
            return Ok(vec![Reply::ephemeral(format!("`{value}` is not a valid PR value. Use a plain number, like `720` or `225.5`."))]);
        }
        Err(StoreError::UnknownUser(_)) => return Ok(vec![not_registered()]),
        Err(StoreError::UnknownEvent(event)) => return Ok(vec![unknown_event(&event)]),
        Err(err) => return Err(err.into()),
    }

    let entries = db.event_leaderboard(event).await?;

    Ok(vec![
        Reply::ephemeral(format!("Your PR for {event} has been updated!")),
        Reply::public(format::event_leaderboard(event, &entries)),
    ])
}

async fn progress(invoker: &Invoker, db: &DbClient, event: &str) -> Res<Vec<Reply>> {
    if let Some(reply) = require_registered_and_event(invoker, db, event).await? {
        return Ok(vec![reply]);
    }

    let rows = db.list_user_prs(&invoker.user_id, event).await?;

    if rows.is_empty() {
        return Ok(vec![Reply::ephemeral(format!("You have no PRs recorded for {event}."))]);
    }

    Ok(vec![Reply::ephemeral(format::progress(event, &rows))])
}

async fn leaderboard(db: &DbClient, event: &str) -> Res<Vec<Reply>> {
    if db.lookup_event(event).await?.is_none() {
        return Ok(vec![unknown_event(event)]);
    }

    let entries = db.event_leaderboard(event).await?;

    if entries.is_empty() {
        return Ok(vec![Reply::ephemeral(format!("No PRs recorded for {event} yet."))]);
    }

    Ok(vec![Reply::public(format::event_leaderboard(event, &entries))])
}

async fn best(db: &DbClient) -> Res<Vec<Reply>> {
    let entries = db.overall_leaderboard().await?;

    if entries.is_empty() {
        return Ok(vec![Reply::ephemeral("No PRs recorded yet.")]);
    }

    Ok(vec![Reply::public(format::overall_leaderboard(&entries))])
}

/// Returns the reply to send if the member is unregistered or the event unknown.
async fn require_registered_and_event(invoker: &Invoker, db: &DbClient, event: &str) -> Res<Option<Reply>> {
    if db.lookup_user(&invoker.user_id).await?.is_none() {
        return Ok(Some(not_registered()));
    }

    if db.lookup_event(event).await?.is_none() {
        return Ok(Some(unknown_event(event)));
    }

    Ok(None)
}

fn not_registered() -> Reply {
    Reply::ephemeral("You need to register first using /register.")
}

fn unknown_event(event: &str) -> Reply {
    Reply::ephemeral(format!("{event} is not a valid event."))
}
