use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::errors::UsersError;
use crate::providers::TokenProvider;
use crate::services::DirectoryService;
use crate::types::dto::auth::{MaskedKeyResponse, SetApiKeyRequest};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{
    CreateUserRequest, ResetUserPasswordRequest, UpdateUserRequest, UserProfile,
};
use crate::types::internal::context::RequestContext;

/// Admin user-directory API endpoints
pub struct UsersApi {
    directory_service: Arc<DirectoryService>,
    token_provider: Arc<TokenProvider>,
}

impl UsersApi {
    pub fn new(directory_service: Arc<DirectoryService>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            directory_service,
            token_provider,
        }
    }

    fn ctx(&self, req: &Request) -> RequestContext {
        RequestContext::from_request(req, &self.token_provider)
    }
}

/// API tags for user directory endpoints
#[derive(Tags)]
enum UserTags {
    /// Admin user management
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// List all user accounts (admin only)
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_users(&self, req: &Request) -> Result<Json<Vec<UserProfile>>, UsersError> {
        let ctx = self.ctx(req);
        let accounts = self.directory_service.list_users(&ctx).await?;
        Ok(Json(accounts.into_iter().map(Into::into).collect()))
    }

    /// Provision a new user account (admin only)
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        req: &Request,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserProfile>, UsersError> {
        let ctx = self.ctx(req);
        let account = self.directory_service.create_user(&ctx, body.0).await?;
        Ok(Json(account.into()))
    }

    /// Fetch one user account (admin only)
    #[oai(path = "/:user_id", method = "get", tag = "UserTags::Users")]
    async fn get_user(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<UserProfile>, UsersError> {
        let ctx = self.ctx(req);
        let account = self.directory_service.get_user(&ctx, &user_id).await?;
        Ok(Json(account.into()))
    }

    /// Merge a partial update into a user account (admin only)
    #[oai(path = "/:user_id", method = "patch", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        req: &Request,
        user_id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserProfile>, UsersError> {
        let ctx = self.ctx(req);
        let account = self
            .directory_service
            .update_user(&ctx, &user_id, body.0)
            .await?;
        Ok(Json(account.into()))
    }

    /// Deactivate a user account (admin only, soft delete)
    #[oai(path = "/:user_id/deactivate", method = "post", tag = "UserTags::Users")]
    async fn deactivate_user(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<MessageResponse>, UsersError> {
        let ctx = self.ctx(req);
        self.directory_service.deactivate_user(&ctx, &user_id).await?;
        Ok(Json(MessageResponse::new("User deactivated")))
    }

    /// Send a password reset email to a user (admin only)
    #[oai(path = "/reset-password", method = "post", tag = "UserTags::Users")]
    async fn reset_user_password(
        &self,
        req: &Request,
        body: Json<ResetUserPasswordRequest>,
    ) -> Result<Json<MessageResponse>, UsersError> {
        let ctx = self.ctx(req);
        self.directory_service
            .reset_user_password(&ctx, &body.email)
            .await?;
        Ok(Json(MessageResponse::new("Password reset email sent")))
    }

    /// Rotate a user's provider API key (admin only)
    #[oai(path = "/:user_id/api-key", method = "put", tag = "UserTags::Users")]
    async fn set_user_api_key(
        &self,
        req: &Request,
        user_id: Path<String>,
        body: Json<SetApiKeyRequest>,
    ) -> Result<Json<MessageResponse>, UsersError> {
        let ctx = self.ctx(req);
        self.directory_service
            .set_user_api_key(&ctx, &user_id, &body.api_key)
            .await?;
        Ok(Json(MessageResponse::new("API key stored")))
    }

    /// Masked view of a user's stored provider API key (admin only)
    #[oai(path = "/:user_id/api-key", method = "get", tag = "UserTags::Users")]
    async fn get_user_api_key(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<MaskedKeyResponse>, UsersError> {
        let ctx = self.ctx(req);
        let masked = self
            .directory_service
            .get_user_api_key(&ctx, &user_id)
            .await?;
        Ok(Json(masked))
    }
}
