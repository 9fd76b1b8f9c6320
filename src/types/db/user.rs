use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone_number: String,
    pub business_name: String,

    // Stored as "user" or "admin"; parsed through Role at the store boundary
    pub role: String,

    // Soft-delete flag; no hard delete path exists
    pub is_active: bool,

    // Default conversation-list filter for this account
    pub agent_id: Option<String>,

    pub created_at: i64,
    pub created_by: Option<String>,
    pub last_login: Option<i64>,
    pub updated_at: i64,
    pub updated_by: Option<String>,
    pub deactivated_at: Option<i64>,
    pub deactivated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
