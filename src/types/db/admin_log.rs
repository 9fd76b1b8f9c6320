use sea_orm::entity::prelude::*;

/// Append-only record of a privileged mutation, stored in the dedicated
/// audit database.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub admin_id: String,
    pub target_user_id: Option<String>,
    pub ip_address: Option<String>,
    pub data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
