// Internal types shared across service and store layers
pub mod audit;
pub mod auth;
pub mod context;
pub mod usage;

pub use audit::{AdminAction, AuditEntry};
pub use auth::{Claims, Role};
pub use context::RequestContext;
