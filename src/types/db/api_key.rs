use sea_orm::entity::prelude::*;

/// Encrypted provider key, one row per owning user.
///
/// `ciphertext` is base64(nonce || AES-256-GCM ciphertext); the plaintext
/// key is never written to the database.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub owner_id: String,
    pub ciphertext: String,
    pub last_updated: i64,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
