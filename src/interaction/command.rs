//! Parsing of inbound chat commands.

use thiserror::Error;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register the invoking member.
    Register,
    /// Record a PR: `/pr <event name> <value>`.
    Pr { event: String, value: String },
    /// Show the invoking member's submissions for an event.
    Progress { event: String },
    /// Show an event leaderboard.
    Leaderboard { event: String },
    /// Show who leads the most events.
    Best,
    /// List the event catalog.
    Events,
}

/// Why a command could not be parsed; the message is shown to the member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command `/{0}`. Try /register, /pr, /progress, /leaderboard, /best, or /events.")]
    Unknown(String),

    #[error("Usage: /{0}")]
    Usage(&'static str),
}

impl Command {
    /// Parses a command name (with or without the leading `/`) and its argument text.
    pub fn parse(name: &str, args: &str) -> Result<Self, CommandError> {
        let name = name.trim().trim_start_matches('/');
        let args = args.trim();

        match name {
            "register" => Ok(Command::Register),
            "best" => Ok(Command::Best),
            "events" => Ok(Command::Events),
            "progress" => event_arg(args, "progress <event>").map(|event| Command::Progress { event }),
            "leaderboard" => event_arg(args, "leaderboard <event>").map(|event| Command::Leaderboard { event }),
            "pr" => {
                // The value is the last token; everything before it is the event name.
                let (event, value) = args.rsplit_once(char::is_whitespace).ok_or(CommandError::Usage("pr <event> <value>"))?;
                let event = event.trim();

                if event.is_empty() {
                    return Err(CommandError::Usage("pr <event> <value>"));
                }

                Ok(Command::Pr {
                    event: event.to_string(),
                    value: value.to_string(),
                })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn event_arg(args: &str, usage: &'static str) -> Result<String, CommandError> {
    if args.is_empty() { Err(CommandError::Usage(usage)) } else { Ok(args.to_string()) }
}

// Tests.
