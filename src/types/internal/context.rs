use std::net::IpAddr;
use std::sync::Arc;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};
use uuid::Uuid;

use crate::providers::TokenProvider;
use crate::types::internal::auth::Claims;

/// Request context that flows through all layers
///
/// Built once at the API boundary and passed explicitly into every service
/// call; services never resolve identity on their own. Carries what the
/// audit log and tracing need about the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: Uuid,

    /// Full JWT claims if the bearer token validated
    pub claims: Option<Claims>,

    /// Actor who initiated the operation (user id, or a system label)
    pub actor_id: String,
}

impl RequestContext {
    /// Context for an authenticated caller with resolved claims
    pub fn authenticated(claims: Claims) -> Self {
        let actor_id = claims.sub.clone();
        Self {
            ip_address: None,
            request_id: Uuid::new_v4(),
            claims: Some(claims),
            actor_id,
        }
    }

    /// Context for internal operations (startup bootstrap, maintenance)
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: Uuid::new_v4(),
            claims: None,
            actor_id: format!("system:{}", operation_name),
        }
    }

    /// Build a context from an incoming HTTP request
    ///
    /// Extracts the client IP, then validates the bearer token if one is
    /// present. A missing or invalid token leaves `claims` as `None`; the
    /// service layer decides whether that is acceptable for the operation.
    pub fn from_request(req: &Request, token_provider: &Arc<TokenProvider>) -> Self {
        let mut ctx = Self {
            ip_address: Self::extract_ip_address(req),
            request_id: Uuid::new_v4(),
            claims: None,
            actor_id: "anonymous".to_string(),
        };

        if let Some(bearer) = Self::extract_bearer(req) {
            match token_provider.validate_token(&bearer.token) {
                Ok(claims) => {
                    ctx.actor_id = claims.sub.clone();
                    ctx.claims = Some(claims);
                }
                Err(e) => {
                    tracing::debug!(request_id = %ctx.request_id, "Bearer token rejected: {}", e);
                }
            }
        }

        tracing::trace!("Request context created: {:?}", ctx);

        ctx
    }

    fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // X-Forwarded-For (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                if let Ok(parsed) = ip.trim().parse() {
                    return Some(parsed);
                }
            }
        }

        // X-Real-IP (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            if let Ok(parsed) = real_ip.parse() {
                return Some(parsed);
            }
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}
