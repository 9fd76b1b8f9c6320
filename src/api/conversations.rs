use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::errors::ConversationError;
use crate::providers::TokenProvider;
use crate::services::ConversationService;
use crate::types::dto::conversation::{AudioLocator, ConversationDetail, ConversationPage};
use crate::types::internal::context::RequestContext;

/// Conversation browsing API endpoints
pub struct ConversationsApi {
    conversation_service: Arc<ConversationService>,
    token_provider: Arc<TokenProvider>,
}

impl ConversationsApi {
    pub fn new(
        conversation_service: Arc<ConversationService>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            conversation_service,
            token_provider,
        }
    }

    fn ctx(&self, req: &Request) -> RequestContext {
        RequestContext::from_request(req, &self.token_provider)
    }
}

/// API tags for conversation endpoints
#[derive(Tags)]
enum ConversationTags {
    /// Recorded conversations
    Conversations,
}

#[OpenApi(prefix_path = "/conversations")]
impl ConversationsApi {
    /// List the caller's conversations
    ///
    /// Search and pagination are applied locally over the full provider
    /// result; the provider has no server-side pagination.
    #[oai(path = "/", method = "get", tag = "ConversationTags::Conversations")]
    async fn list_conversations(
        &self,
        req: &Request,
        agent_id: Query<Option<String>>,
        search: Query<Option<String>>,
        page: Query<Option<u64>>,
        page_size: Query<Option<u64>>,
    ) -> Result<Json<ConversationPage>, ConversationError> {
        let ctx = self.ctx(req);
        let page_result = self
            .conversation_service
            .list_conversations(&ctx, agent_id.0, search.0, page.0, page_size.0)
            .await?;
        Ok(Json(page_result))
    }

    /// One conversation with its full transcript
    #[oai(
        path = "/:conversation_id",
        method = "get",
        tag = "ConversationTags::Conversations"
    )]
    async fn get_conversation(
        &self,
        req: &Request,
        conversation_id: Path<String>,
    ) -> Result<Json<ConversationDetail>, ConversationError> {
        let ctx = self.ctx(req);
        let detail = self
            .conversation_service
            .get_conversation(&ctx, &conversation_id)
            .await?;
        Ok(Json(detail))
    }

    /// Locator for streaming or downloading the conversation audio
    #[oai(
        path = "/:conversation_id/audio",
        method = "get",
        tag = "ConversationTags::Conversations"
    )]
    async fn get_audio_locator(
        &self,
        req: &Request,
        conversation_id: Path<String>,
    ) -> Result<Json<AudioLocator>, ConversationError> {
        let ctx = self.ctx(req);
        let locator = self
            .conversation_service
            .get_audio_locator(&ctx, &conversation_id)
            .await?;
        Ok(Json(locator))
    }
}
