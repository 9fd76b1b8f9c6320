use reqwest::Client;
use serde::Deserialize;

use crate::errors::internal::ProviderError;

/// Header carrying the per-user provider key on every call
pub const API_KEY_HEADER: &str = "xi-api-key";

/// Client for the third-party voice-AI provider HTTP API
///
/// Holds no credentials of its own: every call takes the resolved per-user
/// key. The base URL is configurable so tests can point at a local mock.
pub struct VoiceProviderClient {
    http_client: Client,
    base_url: String,
}

/// Subscription block of the provider's account-info response
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionInfo {
    pub character_count: i64,
    pub character_limit: i64,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    subscription: SubscriptionInfo,
}

/// One conversation as returned by the provider's list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConversation {
    pub conversation_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub call_duration_secs: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ConversationListResponse {
    #[serde(default)]
    conversations: Vec<ProviderConversation>,
}

/// One transcript entry of the provider's detail response. `message` is
/// null for non-speech entries such as tool calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTranscriptEntry {
    pub role: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time_in_call_secs: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCallMetadata {
    #[serde(default)]
    pub start_time_unix_secs: Option<i64>,
    #[serde(default)]
    pub call_duration_secs: Option<i64>,
}

/// Full conversation detail including the transcript
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConversationDetail {
    pub conversation_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<ProviderCallMetadata>,
    #[serde(default)]
    pub transcript: Vec<ProviderTranscriptEntry>,
}

impl VoiceProviderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the subscription metrics for the account behind `api_key`
    pub async fn account_subscription(
        &self,
        api_key: &str,
    ) -> Result<SubscriptionInfo, ProviderError> {
        let url = format!("{}/v1/user", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let response = Self::check_status(response)?;
        let body: AccountInfoResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(body.subscription)
    }

    /// List conversations, optionally filtered by agent id
    ///
    /// The provider has no server-side pagination for this resource; the
    /// full list comes back in one response and filtering/paging happens
    /// locally in the service layer.
    pub async fn list_conversations(
        &self,
        api_key: &str,
        agent_id: Option<&str>,
    ) -> Result<Vec<ProviderConversation>, ProviderError> {
        let url = format!("{}/v1/convai/conversations", self.base_url);
        let mut request = self.http_client.get(&url).header(API_KEY_HEADER, api_key);
        if let Some(agent_id) = agent_id {
            request = request.query(&[("agent_id", agent_id)]);
        }

        let response = Self::check_status(request.send().await?)?;
        let body: ConversationListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(body.conversations)
    }

    /// Fetch one conversation with its full transcript
    pub async fn conversation(
        &self,
        api_key: &str,
        conversation_id: &str,
    ) -> Result<ProviderConversationDetail, ProviderError> {
        let url = format!(
            "{}/v1/convai/conversations/{}",
            self.base_url, conversation_id
        );
        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let response = Self::check_status(response)?;
        let body: ProviderConversationDetail = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(body)
    }

    /// URL for streaming/downloading a conversation's audio. The bytes are
    /// never fetched by this service; callers stream directly with the
    /// returned URL and key header.
    pub fn audio_url(&self, conversation_id: &str) -> String {
        format!(
            "{}/v1/convai/conversations/{}/audio",
            self.base_url, conversation_id
        )
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
