// Services layer - business flows and authorization
//
// Services resolve nothing about the caller themselves: every method takes
// the RequestContext built at the API boundary and performs its own
// capability check against it.

pub mod auth_service;
pub mod conversation_service;
pub mod directory_service;
pub mod usage_service;
pub mod validation;

pub use auth_service::{AuthService, Session};
pub use conversation_service::ConversationService;
pub use directory_service::DirectoryService;
pub use usage_service::UsageService;
