// Configuration layer - settings, secrets, logging, database connections
pub mod database;
pub mod logging;
pub mod secrets;
pub mod settings;

pub use database::DatabaseConnections;
pub use logging::init_logging;
pub use secrets::{SecretError, SecretManager};
pub use settings::{Settings, SettingsError};
