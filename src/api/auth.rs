use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::errors::AuthError;
use crate::providers::TokenProvider;
use crate::services::{AuthService, Session};
use crate::types::dto::auth::{
    ChangePasswordRequest, LoginRequest, MaskedKeyResponse, RequestResetRequest,
    ResetPasswordRequest, SessionResponse, SetApiKeyRequest, SignupRequest, UpdateProfileRequest,
};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserProfile;
use crate::types::internal::context::RequestContext;

/// Authentication and self-service API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    token_provider: Arc<TokenProvider>,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            auth_service,
            token_provider,
        }
    }

    fn ctx(&self, req: &Request) -> RequestContext {
        RequestContext::from_request(req, &self.token_provider)
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Login, signup, and password flows
    Authentication,
}

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        access_token: session.access_token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
        user: session.account.into(),
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account and open a session
    #[oai(path = "/signup", method = "post", tag = "AuthTags::Authentication")]
    async fn signup(&self, body: Json<SignupRequest>) -> Result<Json<SessionResponse>, AuthError> {
        let session = self.auth_service.signup(body.0).await?;
        Ok(Json(session_response(session)))
    }

    /// Login with email and password
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<SessionResponse>, AuthError> {
        let session = self
            .auth_service
            .login(&body.email, &body.password)
            .await?;
        Ok(Json(session_response(session)))
    }

    /// Resolve the caller's own profile
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request) -> Result<Json<UserProfile>, AuthError> {
        let ctx = self.ctx(req);
        let account = self.auth_service.whoami(&ctx).await?;
        Ok(Json(account.into()))
    }

    /// Update the caller's own profile fields
    #[oai(path = "/profile", method = "patch", tag = "AuthTags::Authentication")]
    async fn update_profile(
        &self,
        req: &Request,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserProfile>, AuthError> {
        let ctx = self.ctx(req);
        let account = self.auth_service.update_profile(&ctx, body.0).await?;
        Ok(Json(account.into()))
    }

    /// Change the caller's password
    #[oai(
        path = "/change-password",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn change_password(
        &self,
        req: &Request,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.ctx(req);
        self.auth_service
            .change_password(&ctx, &body.current_password, &body.new_password)
            .await?;
        Ok(Json(MessageResponse::new("Password changed")))
    }

    /// Request a password reset email
    #[oai(
        path = "/request-reset",
        method = "post",
        tag = "AuthTags::Authentication"
    )]
    async fn request_reset(
        &self,
        body: Json<RequestResetRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        self.auth_service.request_password_reset(&body.email).await?;
        Ok(Json(MessageResponse::new(
            "If an account exists for that address, a reset email has been sent",
        )))
    }

    /// Complete a password reset with an emailed token
    #[oai(path = "/reset", method = "post", tag = "AuthTags::Authentication")]
    async fn reset(
        &self,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        self.auth_service
            .reset_password(&body.token, &body.new_password)
            .await?;
        Ok(Json(MessageResponse::new("Password reset")))
    }

    /// Store the caller's provider API key (encrypted at rest)
    #[oai(path = "/api-key", method = "put", tag = "AuthTags::Authentication")]
    async fn set_api_key(
        &self,
        req: &Request,
        body: Json<SetApiKeyRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = self.ctx(req);
        self.auth_service.set_own_api_key(&ctx, &body.api_key).await?;
        Ok(Json(MessageResponse::new("API key stored")))
    }

    /// Masked view of the caller's stored provider API key
    #[oai(path = "/api-key", method = "get", tag = "AuthTags::Authentication")]
    async fn get_api_key(&self, req: &Request) -> Result<Json<MaskedKeyResponse>, AuthError> {
        let ctx = self.ctx(req);
        let masked = self.auth_service.get_own_api_key_masked(&ctx).await?;
        Ok(Json(masked))
    }
}
