use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// One conversation in a list view
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Provider-assigned conversation id
    pub id: String,
    pub title: String,

    /// Unix timestamp of call start
    pub start_time: i64,
    pub duration_seconds: i64,
    pub participants: Vec<String>,
}

/// One page of a locally paginated conversation list
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ConversationPage {
    pub items: Vec<ConversationSummary>,

    /// Total matches across all pages (after filtering)
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

/// One transcript message with a derived absolute timestamp
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub text: String,
    pub sender: String,

    /// Unix timestamp: call start plus the in-call offset
    pub timestamp: i64,
}

/// Full conversation detail including the transcript
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub id: String,
    pub title: String,
    pub start_time: i64,
    pub duration_seconds: i64,
    pub participants: Vec<String>,
    pub messages: Vec<ConversationMessage>,
}

/// Everything a client needs to stream or download conversation audio.
/// The audio bytes themselves never pass through this service.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AudioLocator {
    pub url: String,
    pub auth_header_name: String,
    pub auth_header_value: String,
}
