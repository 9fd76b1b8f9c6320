use serde::{Deserialize, Serialize};

/// Maximum number of retained history entries per usage record.
/// Insertion order is chronological; the oldest entry is evicted first.
pub const HISTORY_CAP: usize = 30;

/// One persisted snapshot of usage metrics at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageHistoryEntry {
    /// Unix timestamp of the snapshot
    pub date: i64,
    pub minutes_used: f64,
    pub credits_used: i64,
}

/// Metrics derived from one provider subscription response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageMetrics {
    pub total_minutes_used: f64,
    pub minutes_remaining: f64,
    pub credits_left: i64,
}

/// A usage record as read from or written to the store, with the history
/// column decoded
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSnapshot {
    pub owner_id: String,
    pub total_minutes_used: f64,
    pub minutes_remaining: f64,
    pub credits_left: i64,
    pub last_updated: i64,
    pub history: Vec<UsageHistoryEntry>,
}

/// Append an entry to a history sequence, evicting from the front once the
/// cap is reached
pub fn push_history_entry(
    mut history: Vec<UsageHistoryEntry>,
    entry: UsageHistoryEntry,
) -> Vec<UsageHistoryEntry> {
    history.push(entry);
    if history.len() > HISTORY_CAP {
        let overflow = history.len() - HISTORY_CAP;
        history.drain(..overflow);
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: i64) -> UsageHistoryEntry {
        UsageHistoryEntry {
            date,
            minutes_used: date as f64,
            credits_used: date,
        }
    }

    #[test]
    fn test_push_below_cap_appends() {
        let history = push_history_entry(vec![entry(1)], entry(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].date, 2);
    }

    #[test]
    fn test_push_at_cap_evicts_oldest() {
        let mut history: Vec<_> = (0..HISTORY_CAP as i64).map(entry).collect();
        history = push_history_entry(history, entry(99));

        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.first().unwrap().date, 1);
        assert_eq!(history.last().unwrap().date, 99);
    }

    #[test]
    fn test_cap_holds_over_many_pushes() {
        let mut history = Vec::new();
        for i in 0..100 {
            history = push_history_entry(history, entry(i));
        }
        assert_eq!(history.len(), HISTORY_CAP);
        // Chronological order preserved after eviction
        assert_eq!(history.first().unwrap().date, 70);
        assert_eq!(history.last().unwrap().date, 99);
    }
}
