use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::usage::{UsageHistoryEntry, UsageSnapshot};

/// One history point of a usage record
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UsageHistoryPoint {
    /// Unix timestamp of the snapshot
    pub date: i64,
    pub minutes_used: f64,
    pub credits_used: i64,
}

impl From<UsageHistoryEntry> for UsageHistoryPoint {
    fn from(entry: UsageHistoryEntry) -> Self {
        Self {
            date: entry.date,
            minutes_used: entry.minutes_used,
            credits_used: entry.credits_used,
        }
    }
}

/// A usage record as exposed to the presentation layer
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    pub owner_id: String,
    pub total_minutes_used: f64,
    pub minutes_remaining: f64,
    pub credits_left: i64,

    /// Unix timestamp of the last refresh
    pub last_updated: i64,

    /// Chronological snapshots, at most 30
    pub history: Vec<UsageHistoryPoint>,
}

impl From<UsageSnapshot> for UsageReport {
    fn from(snapshot: UsageSnapshot) -> Self {
        Self {
            owner_id: snapshot.owner_id,
            total_minutes_used: snapshot.total_minutes_used,
            minutes_remaining: snapshot.minutes_remaining,
            credits_left: snapshot.credits_left,
            last_updated: snapshot.last_updated,
            history: snapshot.history.into_iter().map(Into::into).collect(),
        }
    }
}
