//! Leaderboard ranking over raw PR submissions.
//!
//! Values are stored as the text the member typed, and are only interpreted as
//! numbers here, for comparison.

use std::{cmp::Ordering, collections::HashMap};

use crate::base::types::{LeaderboardEntry, Orientation, OverallEntry, PrRecord};

/// Parses a submitted PR value as a finite real number.
///
/// Only plain decimal strings are accepted (an optional sign, a fraction, and
/// an exponent are fine); clock formats like `12:34` are not.
pub fn parse_value(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;

    // Fold `-0` into `0` so the two compare equal.
    value.is_finite().then_some(value + 0.0)
}

/// Picks each member's best record for one event and ranks them.
///
/// The best record is the minimum (or maximum) numeric value per the event's
/// orientation; between equal values the earlier record wins. Ranking is by
/// value, then by the best record's timestamp ascending, then by sequence
/// number. Records with unparsable values are ignored.
pub fn rank(orientation: Orientation, records: impl IntoIterator<Item = PrRecord>) -> Vec<PrRecord> {
    let mut best: HashMap<String, (f64, PrRecord)> = HashMap::new();

    for record in records {
        let Some(value) = parse_value(&record.value) else {
            continue;
        };

        let improves = match best.get(&record.user_id) {
            Some((current, current_record)) => compare(orientation, (value, &record), (*current, current_record)) == Ordering::Less,
            None => true,
        };

        if improves {
            best.insert(record.user_id.clone(), (value, record));
        }
    }

    let mut ranked: Vec<(f64, PrRecord)> = best.into_values().collect();
    ranked.sort_by(|a, b| compare(orientation, (a.0, &a.1), (b.0, &b.1)));

    ranked.into_iter().map(|(_, record)| record).collect()
}

/// Counts how many event leaderboards each member currently leads.
///
/// Sorted by count descending, then display name ascending. Members who lead
/// nothing are omitted.
pub fn count_first_places(boards: impl IntoIterator<Item = Vec<LeaderboardEntry>>) -> Vec<OverallEntry> {
    let mut counts: HashMap<String, OverallEntry> = HashMap::new();

    for leader in boards.into_iter().filter_map(|board| board.into_iter().next()) {
        counts
            .entry(leader.user_id.clone())
            .or_insert_with(|| OverallEntry {
                display_name: leader.display_name,
                user_id: leader.user_id,
                first_places: 0,
            })
            .first_places += 1;
    }

    let mut overall: Vec<OverallEntry> = counts.into_values().collect();
    overall.sort_by(|a, b| b.first_places.cmp(&a.first_places).then_with(|| a.display_name.cmp(&b.display_name)));

    overall
}

fn compare(orientation: Orientation, (a, a_record): (f64, &PrRecord), (b, b_record): (f64, &PrRecord)) -> Ordering {
    orientation
        .compare(a, b)
        .then_with(|| a_record.recorded_at.cmp(&b_record.recorded_at))
        .then_with(|| a_record.seq.cmp(&b_record.seq))
}

// Tests.
