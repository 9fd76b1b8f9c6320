mod common;

use common::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voicedash_backend::errors::ConversationError;

/// Fixture of 15 conversations; three of them involve "Sam" in the title
/// or participant list, in varying case.
fn list_fixture() -> serde_json::Value {
    let mut conversations = Vec::new();
    for i in 0..12 {
        conversations.push(json!({
            "conversation_id": format!("conv-{}", i),
            "agent_name": format!("Support Agent {}", i),
            "start_time_unix_secs": 1_700_000_000 + i * 60,
            "call_duration_secs": 90 + i
        }));
    }
    conversations.push(json!({
        "conversation_id": "conv-sam-1",
        "agent_name": "Samantha",
        "start_time_unix_secs": 1_700_100_000,
        "call_duration_secs": 120
    }));
    conversations.push(json!({
        "conversation_id": "conv-sam-2",
        "agent_name": "SAM the bot",
        "start_time_unix_secs": 1_700_100_100,
        "call_duration_secs": 45
    }));
    conversations.push(json!({
        "conversation_id": "conv-sam-3",
        "agent_name": "sample run",
        "start_time_unix_secs": 1_700_100_200,
        "call_duration_secs": 30
    }));
    json!({ "conversations": conversations, "total_count": 15 })
}

async fn backend_with_key(server: &MockServer) -> (TestBackend, voicedash_backend::types::internal::context::RequestContext) {
    let backend = setup_backend(&server.uri()).await;
    let account = create_user(&backend, "owner@example.com").await;
    let ctx = ctx_for(&account);
    backend
        .credential_store
        .set_credential(&ctx, &account.id, "sk-live-convo")
        .await
        .unwrap();
    (backend, ctx)
}

#[tokio::test]
async fn test_search_matches_title_and_participants_case_insensitively() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations"))
        .and(header("xi-api-key", "sk-live-convo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_fixture()))
        .mount(&server)
        .await;

    let (backend, ctx) = backend_with_key(&server).await;
    let page = backend
        .conversation_service
        .list_conversations(&ctx, None, Some("sam".to_string()), None, None)
        .await
        .unwrap();

    assert_eq!(page.total_count, 3);
    let ids: Vec<_> = page.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["conv-sam-1", "conv-sam-2", "conv-sam-3"]);
}

#[tokio::test]
async fn test_pagination_splits_fifteen_items_as_twelve_then_three() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_fixture()))
        .mount(&server)
        .await;

    let (backend, ctx) = backend_with_key(&server).await;

    let page1 = backend
        .conversation_service
        .list_conversations(&ctx, None, None, Some(1), Some(12))
        .await
        .unwrap();
    assert_eq!(page1.items.len(), 12);
    assert_eq!(page1.total_count, 15);

    let page2 = backend
        .conversation_service
        .list_conversations(&ctx, None, None, Some(2), Some(12))
        .await
        .unwrap();
    assert_eq!(page2.items.len(), 3);
    assert_eq!(page2.items[0].id, "conv-sam-1");
}

#[tokio::test]
async fn test_explicit_agent_filter_is_forwarded_to_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations"))
        .and(query_param("agent_id", "agent-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "conversations": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (backend, ctx) = backend_with_key(&server).await;
    let page = backend
        .conversation_service
        .list_conversations(&ctx, Some("agent-42".to_string()), None, None, None)
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_profile_agent_id_is_used_when_no_filter_given() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations"))
        .and(query_param("agent_id", "agent-profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "conversations": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = setup_backend(&server.uri()).await;
    let account = create_user(&backend, "owner@example.com").await;
    let ctx = ctx_for(&account);
    backend
        .credential_store
        .set_credential(&ctx, &account.id, "sk-live-convo")
        .await
        .unwrap();
    backend
        .user_store
        .apply_update(
            &account.id,
            voicedash_backend::stores::UserUpdate {
                agent_id: Some("agent-profile".to_string()),
                ..Default::default()
            },
            &account.id,
        )
        .await
        .unwrap();

    backend
        .conversation_service
        .list_conversations(&ctx, None, None, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_detail_maps_transcript_with_absolute_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations/conv-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv-1",
            "agent_name": "Samantha",
            "metadata": {
                "start_time_unix_secs": 1_700_000_000,
                "call_duration_secs": 120
            },
            "transcript": [
                { "role": "agent", "message": "Hello, how can I help?", "time_in_call_secs": 0 },
                { "role": "agent", "message": null, "time_in_call_secs": 5 },
                { "role": "user", "message": "I need my invoice.", "time_in_call_secs": 9 }
            ]
        })))
        .mount(&server)
        .await;

    let (backend, ctx) = backend_with_key(&server).await;
    let detail = backend
        .conversation_service
        .get_conversation(&ctx, "conv-1")
        .await
        .unwrap();

    assert_eq!(detail.title, "Samantha");
    assert_eq!(detail.duration_seconds, 120);
    assert_eq!(detail.participants, vec!["User", "Samantha"]);

    // The null-message entry (tool call) is dropped
    assert_eq!(detail.messages.len(), 2);
    assert_eq!(detail.messages[0].sender, "Samantha");
    assert_eq!(detail.messages[0].timestamp, 1_700_000_000);
    assert_eq!(detail.messages[1].sender, "User");
    assert_eq!(detail.messages[1].timestamp, 1_700_000_009);
    assert!(detail.messages[0].timestamp <= detail.messages[1].timestamp);
}

#[tokio::test]
async fn test_provider_404_maps_to_conversation_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (backend, ctx) = backend_with_key(&server).await;
    match backend.conversation_service.get_conversation(&ctx, "gone").await {
        Err(ConversationError::NotFound(body)) => {
            assert!(body.0.message.contains("deleted") || body.0.message.contains("access"));
        }
        other => panic!("Expected not-found, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_other_provider_errors_pass_through_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/convai/conversations/conv-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (backend, ctx) = backend_with_key(&server).await;
    match backend.conversation_service.get_conversation(&ctx, "conv-1").await {
        Err(ConversationError::Provider(body)) => {
            assert!(body.0.message.contains("500"));
        }
        other => panic!("Expected provider error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_list_without_credential_is_credential_missing() {
    let backend = setup_offline_backend().await;
    let account = create_user(&backend, "owner@example.com").await;
    let ctx = ctx_for(&account);

    let result = backend
        .conversation_service
        .list_conversations(&ctx, None, None, None, None)
        .await;
    assert!(matches!(result, Err(ConversationError::CredentialMissing(_))));
}

#[tokio::test]
async fn test_audio_locator_returns_url_and_auth_header() {
    let server = MockServer::start().await;
    let (backend, ctx) = backend_with_key(&server).await;

    let locator = backend
        .conversation_service
        .get_audio_locator(&ctx, "conv-9")
        .await
        .unwrap();

    assert_eq!(
        locator.url,
        format!("{}/v1/convai/conversations/conv-9/audio", server.uri())
    );
    assert_eq!(locator.auth_header_name, "xi-api-key");
    assert_eq!(locator.auth_header_value, "sk-live-convo");
}
