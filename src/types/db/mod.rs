// Database entities - SeaORM models
pub mod admin_log;
pub mod api_key;
pub mod reset_token;
pub mod usage_record;
pub mod user;
