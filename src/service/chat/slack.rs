//! Slack integration for pr-bot.
//!
//! This module connects to Slack in socket mode and serves the bot's slash
//! commands:
//! - `/register`, `/pr`, `/progress`, `/leaderboard`, `/best`, `/events`
//! - The first reply answers the command (ephemeral or in-channel)
//! - Further public replies go through the command's `response_url`, which
//!   works in channels the bot has not joined and in DMs
//!
//! Member roles are the names and handles of the Slack user groups they belong to.

use crate::{
    base::{
        config::Config,
        types::{Invoker, Reply, Res, Visibility, Void},
    },
    interaction::dispatch,
    service::db::DbClient,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{Instrument, error, info, instrument, warn};

use std::{ops::Deref, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, db: DbClient) -> Res<Self> {
        let client = SlackChatClient::new(config, db).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    db: DbClient,
    chat: ChatClient,
    registration_role: String,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub client: Arc<FullClient>,
    pub db: DbClient,
    pub registration_role: String,
}

impl Deref for SlackChatClient {
    type Target = FullClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, db: DbClient) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Fail fast on a bad bot token.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await.map_err(|e| anyhow::anyhow!("Slack bot token was rejected: {}", e))?;

        info!("Authenticated with Slack as `{}`.", bot_user.user_id.0);

        Ok(Self {
            app_token,
            bot_token,
            client,
            db,
            registration_role: config.registration_role.clone(),
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_command_events(handle_command_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            db: self.db.clone(),
            chat: ChatClient::from(self.clone()),
            registration_role: self.registration_role.clone(),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for commands.
        socket_mode_listener.listen_for(&self.app_token).await?;

        // Serve until Ctrl-C.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, channel_id: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message).with_link_names(true);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn member_roles(&self, user_id: &str) -> Res<Vec<String>> {
        let request = SlackApiUserGroupsListRequest::new().with_include_users(true);

        let session = self.client.open_session(&self.bot_token);

        let response = session.usergroups_list(&request).await.map_err(|e| anyhow::anyhow!("Failed to list user groups: {}", e))?;

        let member = SlackUserId(user_id.to_string());
        let roles = response
            .usergroups
            .into_iter()
            .filter(|group| group.users.as_ref().is_some_and(|users| users.contains(&member)))
            .flat_map(|group| [group.name, group.handle])
            .collect();

        Ok(roles)
    }
}

// Socket mode listener callbacks for Slack.

/// Handles slash command events from Slack.
#[instrument(skip_all, fields(command = %event.command.0))]
async fn handle_command_event(
    event: SlackCommandEvent,
    client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    let (db, chat, registration_role) = {
        let states = states.read().await;
        let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

        (user_state.db.clone(), user_state.chat.clone(), user_state.registration_role.clone())
    };

    info!("Received command event ...");

    let user_id = event.user_id.0.clone();
    let invoker = Invoker {
        mention: format!("<@{user_id}>"),
        user_id,
    };
    let args = event.text.clone().unwrap_or_default();

    let replies = match dispatch::handle_raw_command(&event.command.0, &args, &invoker, &db, &chat, &registration_role).await {
        Ok(replies) => replies,
        Err(err) => {
            error!("Error while handling: {}", err);
            vec![Reply::ephemeral("Something went wrong while handling that command. Please try again later.")]
        }
    };

    let mut replies = replies.into_iter();
    let first = replies.next().unwrap_or_else(|| Reply::ephemeral("Done."));

    // Anything after the first reply is sent once the command has been answered.

    let follow_ups: Vec<Reply> = replies.collect();
    if !follow_ups.is_empty() {
        let response_url = event.response_url.clone();
        let channel_id = event.channel_id.0.clone();

        tokio::spawn(
            async move {
                for reply in follow_ups {
                    let Some(request) = follow_up_request(&reply) else {
                        warn!("Dropping non-public follow-up reply.");
                        continue;
                    };

                    let Err(err) = client.respond_to_event(&response_url, &request).await else {
                        continue;
                    };

                    warn!("Responding via `response_url` failed ({}); posting to the channel instead.", err);

                    if let Err(err) = chat.post_message(&channel_id, &reply.text).await {
                        error!("Error while posting follow-up: {}", err);
                    }
                }
            }
            .in_current_span(),
        );
    }

    Ok(command_response(first))
}

/// Maps a reply onto a slash-command response of the matching visibility.
fn command_response(reply: Reply) -> SlackCommandEventResponse {
    let response_type = match reply.visibility {
        Visibility::Ephemeral => SlackMessageResponseType::Ephemeral,
        Visibility::Public => SlackMessageResponseType::InChannel,
    };

    SlackCommandEventResponse::new(SlackMessageContent::new().with_text(reply.text)).with_response_type(response_type)
}

/// Builds the in-channel webhook message for a follow-up; only public replies are sent.
fn follow_up_request(reply: &Reply) -> Option<SlackApiPostWebhookMessageRequest> {
    if reply.visibility != Visibility::Public {
        return None;
    }

    Some(SlackApiPostWebhookMessageRequest::new(SlackMessageContent::new().with_text(reply.text.clone())).with_response_type(SlackMessageResponseType::InChannel))
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_replies_are_posted_in_channel() {
        let response = command_response(Reply::public("*Plank Leaderboard:*"));

        assert!(matches!(response.response_type, Some(SlackMessageResponseType::InChannel)));
        assert_eq!(response.content.text.as_deref(), Some("*Plank Leaderboard:*"));
    }

    #[test]
    fn ephemeral_replies_stay_private() {
        let response = command_response(Reply::ephemeral("You need to register first using /register."));

        assert!(matches!(response.response_type, Some(SlackMessageResponseType::Ephemeral)));
    }

    #[test]
    fn public_follow_ups_are_sent_in_channel() {
        let request = follow_up_request(&Reply::public("*Plank Leaderboard:*\n1. <@U1> - 90")).unwrap();

        assert!(matches!(request.response_type, Some(SlackMessageResponseType::InChannel)));
        assert_eq!(request.content.text.as_deref(), Some("*Plank Leaderboard:*\n1. <@U1> - 90"));
    }

    #[test]
    fn private_follow_ups_are_not_sent() {
        assert!(follow_up_request(&Reply::ephemeral("Your PR for Plank has been updated!")).is_none());
    }
}
