use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::types::db::usage_record::{self, Entity as UsageRecord};
use crate::types::internal::usage::{
    push_history_entry, UsageHistoryEntry, UsageMetrics, UsageSnapshot,
};

/// Repository for per-user usage records with capped history
pub struct UsageStore {
    db: DatabaseConnection,
}

impl UsageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the zeroed usage record for a freshly provisioned account.
    /// A record that already exists is left untouched.
    pub async fn init_empty(&self, owner_id: &str) -> Result<(), InternalError> {
        let existing = UsageRecord::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_usage_record", e))?;
        if existing.is_some() {
            return Ok(());
        }

        let row = usage_record::ActiveModel {
            owner_id: Set(owner_id.to_string()),
            total_minutes_used: Set(0.0),
            minutes_remaining: Set(0.0),
            credits_left: Set(0),
            last_updated: Set(Utc::now().timestamp()),
            history: Set("[]".to_string()),
        };
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("init_usage_record", e))?;

        Ok(())
    }

    /// Read one usage record, decoding the history column
    pub async fn get(&self, owner_id: &str) -> Result<Option<UsageSnapshot>, InternalError> {
        let Some(model) = UsageRecord::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_usage_record", e))?
        else {
            return Ok(None);
        };

        Ok(Some(Self::decode(model)?))
    }

    /// Persist a fresh snapshot: overwrite the headline metrics and append
    /// one history entry, evicting the oldest past the 30-entry cap
    pub async fn record_snapshot(
        &self,
        owner_id: &str,
        metrics: UsageMetrics,
    ) -> Result<UsageSnapshot, InternalError> {
        let now = Utc::now().timestamp();
        let entry = UsageHistoryEntry {
            date: now,
            minutes_used: metrics.total_minutes_used,
            credits_used: metrics.credits_left,
        };

        let existing = UsageRecord::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_usage_record", e))?;

        let history = match &existing {
            Some(model) => Self::decode_history(&model.history)?,
            None => Vec::new(),
        };
        let history = push_history_entry(history, entry);
        let history_json = serde_json::to_string(&history)
            .map_err(|e| InternalError::parse("usage_history", e.to_string()))?;

        let model = match existing {
            Some(model) => {
                let mut active: usage_record::ActiveModel = model.into();
                active.total_minutes_used = Set(metrics.total_minutes_used);
                active.minutes_remaining = Set(metrics.minutes_remaining);
                active.credits_left = Set(metrics.credits_left);
                active.last_updated = Set(now);
                active.history = Set(history_json);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| InternalError::database("update_usage_record", e))?
            }
            None => {
                let row = usage_record::ActiveModel {
                    owner_id: Set(owner_id.to_string()),
                    total_minutes_used: Set(metrics.total_minutes_used),
                    minutes_remaining: Set(metrics.minutes_remaining),
                    credits_left: Set(metrics.credits_left),
                    last_updated: Set(now),
                    history: Set(history_json),
                };
                row.insert(&self.db)
                    .await
                    .map_err(|e| InternalError::database("insert_usage_record", e))?
            }
        };

        Self::decode(model)
    }

    /// Read the persisted records for the given owners, in the owners'
    /// order. Owners with no record yet are skipped.
    pub async fn list_for_owners(
        &self,
        owner_ids: &[String],
    ) -> Result<Vec<UsageSnapshot>, InternalError> {
        let models = UsageRecord::find()
            .filter(usage_record::Column::OwnerId.is_in(owner_ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_usage_records", e))?;

        let mut by_owner: std::collections::HashMap<String, usage_record::Model> = models
            .into_iter()
            .map(|m| (m.owner_id.clone(), m))
            .collect();

        let mut snapshots = Vec::new();
        for owner_id in owner_ids {
            if let Some(model) = by_owner.remove(owner_id) {
                snapshots.push(Self::decode(model)?);
            }
        }
        Ok(snapshots)
    }

    fn decode(model: usage_record::Model) -> Result<UsageSnapshot, InternalError> {
        let history = Self::decode_history(&model.history)?;
        Ok(UsageSnapshot {
            owner_id: model.owner_id,
            total_minutes_used: model.total_minutes_used,
            minutes_remaining: model.minutes_remaining,
            credits_left: model.credits_left,
            last_updated: model.last_updated,
            history,
        })
    }

    fn decode_history(raw: &str) -> Result<Vec<UsageHistoryEntry>, InternalError> {
        serde_json::from_str(raw).map_err(|e| InternalError::parse("usage_history", e.to_string()))
    }
}
