use sea_orm::entity::prelude::*;

/// Persisted usage metrics, one row per owning user.
///
/// `history` is a JSON array of snapshot entries, capped at 30 elements
/// (oldest evicted first) by the usage store.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "usage_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub owner_id: String,
    pub total_minutes_used: f64,
    pub minutes_remaining: f64,
    pub credits_left: i64,
    pub last_updated: i64,
    pub history: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
