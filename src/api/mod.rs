// API layer - HTTP endpoints
//
// Every endpoint builds a RequestContext from the incoming request and
// hands it to the service layer; authorization decisions live there.
pub mod auth;
pub mod conversations;
pub mod health;
pub mod usage;
pub mod users;

pub use auth::AuthApi;
pub use conversations::ConversationsApi;
pub use health::HealthApi;
pub use usage::UsageApi;
pub use users::UsersApi;
