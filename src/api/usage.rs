use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::errors::UsageError;
use crate::providers::TokenProvider;
use crate::services::UsageService;
use crate::types::dto::usage::UsageReport;
use crate::types::internal::context::RequestContext;

/// Usage metrics API endpoints
pub struct UsageApi {
    usage_service: Arc<UsageService>,
    token_provider: Arc<TokenProvider>,
}

impl UsageApi {
    pub fn new(usage_service: Arc<UsageService>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            usage_service,
            token_provider,
        }
    }

    fn ctx(&self, req: &Request) -> RequestContext {
        RequestContext::from_request(req, &self.token_provider)
    }
}

/// API tags for usage endpoints
#[derive(Tags)]
enum UsageTags {
    /// Consumption metrics
    Usage,
}

#[OpenApi(prefix_path = "/usage")]
impl UsageApi {
    /// Refresh and return the caller's usage record
    ///
    /// Calls the voice provider with the caller's stored key and persists
    /// one history entry; POST because of the persisted side effect.
    #[oai(path = "/me", method = "post", tag = "UsageTags::Usage")]
    async fn fetch_for_self(&self, req: &Request) -> Result<Json<UsageReport>, UsageError> {
        let ctx = self.ctx(req);
        let snapshot = self.usage_service.fetch_for_self(&ctx).await?;
        Ok(Json(snapshot.into()))
    }

    /// Refresh and return another user's usage record (admin only)
    #[oai(path = "/users/:user_id", method = "post", tag = "UsageTags::Usage")]
    async fn fetch_for_user(
        &self,
        req: &Request,
        user_id: Path<String>,
    ) -> Result<Json<UsageReport>, UsageError> {
        let ctx = self.ctx(req);
        let snapshot = self.usage_service.fetch_for_user(&ctx, &user_id).await?;
        Ok(Json(snapshot.into()))
    }

    /// Persisted usage records for all active users (admin only)
    ///
    /// Reads the stored records only; never fans out to the provider.
    #[oai(path = "/all", method = "get", tag = "UsageTags::Usage")]
    async fn fetch_all_users(&self, req: &Request) -> Result<Json<Vec<UsageReport>>, UsageError> {
        let ctx = self.ctx(req);
        let snapshots = self.usage_service.fetch_all_users(&ctx).await?;
        Ok(Json(snapshots.into_iter().map(Into::into).collect()))
    }
}
