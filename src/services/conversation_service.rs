use std::sync::Arc;

use crate::errors::ConversationError;
use crate::errors::internal::ProviderError;
use crate::providers::voice_provider::{ProviderConversation, API_KEY_HEADER};
use crate::providers::VoiceProviderClient;
use crate::stores::{CredentialStore, UserStore};
use crate::types::dto::conversation::{
    AudioLocator, ConversationDetail, ConversationMessage, ConversationPage, ConversationSummary,
};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

const UNTITLED: &str = "Untitled Conversation";
const FALLBACK_AGENT: &str = "AI Agent";
const FALLBACK_ASSISTANT: &str = "AI Assistant";

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Browses conversations recorded at the voice provider
///
/// Conversations are transient: nothing here is persisted. Every call
/// resolves the caller's own credential; there is no cross-user path.
/// The provider returns full lists only, so search and pagination are
/// applied locally.
pub struct ConversationService {
    user_store: Arc<UserStore>,
    credential_store: Arc<CredentialStore>,
    voice_client: Arc<VoiceProviderClient>,
}

impl ConversationService {
    pub fn new(
        user_store: Arc<UserStore>,
        credential_store: Arc<CredentialStore>,
        voice_client: Arc<VoiceProviderClient>,
    ) -> Self {
        Self {
            user_store,
            credential_store,
            voice_client,
        }
    }

    fn require_auth<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Claims, ConversationError> {
        ctx.claims
            .as_ref()
            .ok_or_else(ConversationError::unauthenticated)
    }

    async fn resolve_api_key(&self, owner_id: &str) -> Result<String, ConversationError> {
        let credential = self
            .credential_store
            .get_credential(owner_id)
            .await?
            .ok_or_else(ConversationError::credential_missing)?;
        Ok(credential.plaintext)
    }

    /// List the caller's conversations with local filtering and pagination
    ///
    /// `agent_filter` overrides the agent id stored on the caller's
    /// profile; with neither set, all conversations visible to the key are
    /// listed. `search_text` matches title and participants,
    /// case-insensitively.
    pub async fn list_conversations(
        &self,
        ctx: &RequestContext,
        agent_filter: Option<String>,
        search_text: Option<String>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<ConversationPage, ConversationError> {
        let claims = self.require_auth(ctx)?;
        let api_key = self.resolve_api_key(&claims.sub).await?;

        // Explicit filter beats the one stored on the profile
        let profile_agent = self
            .user_store
            .find_by_id(&claims.sub)
            .await?
            .and_then(|account| account.agent_id);
        let effective_agent = agent_filter.or(profile_agent);

        let raw = self
            .voice_client
            .list_conversations(&api_key, effective_agent.as_deref())
            .await
            .map_err(|e| ConversationError::provider(&e))?;

        let mut summaries: Vec<ConversationSummary> =
            raw.into_iter().map(summarize_conversation).collect();

        if let Some(needle) = search_text.as_deref() {
            let needle = needle.to_lowercase();
            summaries.retain(|summary| matches_search(summary, &needle));
        }

        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let total_count = summaries.len() as i64;
        let items = paginate(summaries, page, page_size);

        Ok(ConversationPage {
            items,
            total_count,
            page: page as i64,
            page_size: page_size as i64,
        })
    }

    /// One conversation with its full transcript
    ///
    /// Transcript entries without a message body (tool calls) are dropped;
    /// each remaining message gets an absolute timestamp derived from the
    /// call start time plus its in-call offset.
    pub async fn get_conversation(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ConversationError> {
        let claims = self.require_auth(ctx)?;
        let api_key = self.resolve_api_key(&claims.sub).await?;

        let detail = self
            .voice_client
            .conversation(&api_key, conversation_id)
            .await
            .map_err(|e| match e {
                ProviderError::Status { status: 404 } => {
                    ConversationError::not_found(conversation_id)
                }
                other => ConversationError::provider(&other),
            })?;

        let agent_name = detail.agent_name.clone();
        let start_time = detail
            .metadata
            .as_ref()
            .and_then(|m| m.start_time_unix_secs)
            .unwrap_or(0);
        let duration_seconds = detail
            .metadata
            .as_ref()
            .and_then(|m| m.call_duration_secs)
            .unwrap_or(0);

        let messages: Vec<ConversationMessage> = detail
            .transcript
            .into_iter()
            .filter(|entry| entry.message.is_some())
            .enumerate()
            .map(|(index, entry)| {
                let offset = entry.time_in_call_secs.unwrap_or(0);
                let sender = if entry.role == "agent" {
                    agent_name
                        .clone()
                        .unwrap_or_else(|| FALLBACK_ASSISTANT.to_string())
                } else {
                    "User".to_string()
                };
                ConversationMessage {
                    id: format!("msg-{}-{}", index, offset),
                    text: entry.message.unwrap_or_default(),
                    sender,
                    timestamp: start_time + offset,
                }
            })
            .collect();

        Ok(ConversationDetail {
            id: detail.conversation_id,
            title: agent_name.clone().unwrap_or_else(|| UNTITLED.to_string()),
            start_time,
            duration_seconds,
            participants: participants_for(agent_name.as_deref()),
            messages,
        })
    }

    /// Everything needed to stream or download a conversation's audio;
    /// the bytes themselves are fetched by the client directly
    pub async fn get_audio_locator(
        &self,
        ctx: &RequestContext,
        conversation_id: &str,
    ) -> Result<AudioLocator, ConversationError> {
        let claims = self.require_auth(ctx)?;
        let api_key = self.resolve_api_key(&claims.sub).await?;

        Ok(AudioLocator {
            url: self.voice_client.audio_url(conversation_id),
            auth_header_name: API_KEY_HEADER.to_string(),
            auth_header_value: api_key,
        })
    }
}

fn summarize_conversation(raw: ProviderConversation) -> ConversationSummary {
    let title = raw
        .agent_name
        .clone()
        .unwrap_or_else(|| UNTITLED.to_string());
    ConversationSummary {
        id: raw.conversation_id,
        title,
        start_time: raw.start_time_unix_secs.unwrap_or(0),
        duration_seconds: raw.call_duration_secs.unwrap_or(0),
        participants: participants_for(raw.agent_name.as_deref()),
    }
}

fn participants_for(agent_name: Option<&str>) -> Vec<String> {
    match agent_name {
        Some(name) => vec!["User".to_string(), name.to_string()],
        None => vec!["User".to_string(), FALLBACK_AGENT.to_string()],
    }
}

/// Case-insensitive substring match over title and participants. The
/// needle must already be lowercased.
fn matches_search(summary: &ConversationSummary, needle: &str) -> bool {
    summary.title.to_lowercase().contains(needle)
        || summary
            .participants
            .iter()
            .any(|participant| participant.to_lowercase().contains(needle))
}

/// Local pagination over the full, already-filtered result set. `page` is
/// 1-based; a page past the end is empty.
fn paginate(items: Vec<ConversationSummary>, page: u64, page_size: u64) -> Vec<ConversationSummary> {
    let start = (page - 1).saturating_mul(page_size) as usize;
    items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect()
}
