//! Rendering of store results into Slack `mrkdwn` text.

use chrono::DateTime;

use crate::base::types::{Event, LeaderboardEntry, OverallEntry, PrProgress};

/// `*Event Leaderboard:*` followed by `N. name - value`, ranked from 1.
pub fn event_leaderboard(event_name: &str, entries: &[LeaderboardEntry]) -> String {
    let lines: Vec<String> = entries.iter().enumerate().map(|(i, e)| format!("{}. {} - {}", i + 1, e.display_name, e.best_value)).collect();

    format!("*{event_name} Leaderboard:*\n{}", lines.join("\n"))
}

pub fn overall_leaderboard(entries: &[OverallEntry]) -> String {
    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let noun = if e.first_places == 1 { "top rank" } else { "top ranks" };
            format!("{}. {} - {} {noun}", i + 1, e.display_name, e.first_places)
        })
        .collect();

    format!("*Overall Leaderboard:*\n{}", lines.join("\n"))
}

pub fn progress(event_name: &str, rows: &[PrProgress]) -> String {
    let lines: Vec<String> = rows.iter().map(|row| format!("{}: {}", timestamp(&row.recorded_at), row.value)).collect();

    format!("*Your Progress in {event_name}:*\n{}", lines.join("\n"))
}

pub fn events(events: &[Event]) -> String {
    let lines: Vec<String> = events
        .iter()
        .map(|e| if e.time_based { format!("• {} (time, lower is better)", e.name) } else { format!("• {}", e.name) })
        .collect();

    format!("*Events:*\n{}", lines.join("\n"))
}

/// Shortens a stored RFC 3339 timestamp for display; unparsable input is shown as-is.
fn timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()).unwrap_or_else(|_| raw.to_string())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaderboards_are_ranked_from_one() {
        let entries = vec![
            LeaderboardEntry {
                display_name: "<@B>".to_string(),
                best_value: "11.0".to_string(),
                user_id: "B".to_string(),
                recorded_at: String::new(),
            },
            LeaderboardEntry {
                display_name: "<@A>".to_string(),
                best_value: "12.5".to_string(),
                user_id: "A".to_string(),
                recorded_at: String::new(),
            },
        ];

        assert_eq!(event_leaderboard("2 Mile Run", &entries), "*2 Mile Run Leaderboard:*\n1. <@B> - 11.0\n2. <@A> - 12.5");
    }

    #[test]
    fn overall_pluralizes_ranks() {
        let entries = vec![
            OverallEntry {
                display_name: "<@A>".to_string(),
                user_id: "A".to_string(),
                first_places: 2,
            },
            OverallEntry {
                display_name: "<@B>".to_string(),
                user_id: "B".to_string(),
                first_places: 1,
            },
        ];

        assert_eq!(overall_leaderboard(&entries), "*Overall Leaderboard:*\n1. <@A> - 2 top ranks\n2. <@B> - 1 top rank");
    }

    #[test]
    fn progress_shortens_timestamps() {
        let rows = vec![
            PrProgress {
                value: "90".to_string(),
                recorded_at: "2024-03-05T07:08:09.123456Z".to_string(),
            },
            PrProgress {
                value: "95".to_string(),
                recorded_at: "yesterday".to_string(),
            },
        ];

        assert_eq!(progress("Plank", &rows), "*Your Progress in Plank:*\n2024-03-05 07:08 UTC: 90\nyesterday: 95");
    }
}
