mod common;

use common::*;
use voicedash_backend::errors::AuthError;
use voicedash_backend::types::dto::auth::{SignupRequest, UpdateProfileRequest};

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        password: "initial-password-1".to_string(),
        display_name: "Signup User".to_string(),
        phone_number: "555-0300".to_string(),
        business_name: None,
        agent_id: None,
    }
}

#[tokio::test]
async fn test_signup_provisions_account_and_usage_record() {
    let backend = setup_offline_backend().await;

    let session = backend
        .auth_service
        .signup(signup_request("new@example.com"))
        .await
        .unwrap();

    assert_eq!(session.account.email, "new@example.com");
    // Self-signup never grants the admin role
    assert_eq!(session.account.role, "user");
    assert!(!session.access_token.is_empty());

    let usage = backend
        .usage_store
        .get(&session.account.id)
        .await
        .unwrap()
        .expect("usage record should exist");
    assert!(usage.history.is_empty());
}

#[tokio::test]
async fn test_signup_rejects_duplicates_and_bad_input() {
    let backend = setup_offline_backend().await;
    backend
        .auth_service
        .signup(signup_request("taken@example.com"))
        .await
        .unwrap();

    assert!(matches!(
        backend
            .auth_service
            .signup(signup_request("taken@example.com"))
            .await,
        Err(AuthError::Validation(_))
    ));

    let mut bad_email = signup_request("bad");
    bad_email.email = "bad".to_string();
    assert!(matches!(
        backend.auth_service.signup(bad_email).await,
        Err(AuthError::Validation(_))
    ));

    let mut short_password = signup_request("short@example.com");
    short_password.password = "short".to_string();
    assert!(matches!(
        backend.auth_service.signup(short_password).await,
        Err(AuthError::Validation(_))
    ));
}

#[tokio::test]
async fn test_login_round_trip_and_token_validation() {
    let backend = setup_offline_backend().await;
    backend
        .auth_service
        .signup(signup_request("login@example.com"))
        .await
        .unwrap();

    let session = backend
        .auth_service
        .login("login@example.com", "initial-password-1")
        .await
        .unwrap();

    let claims = backend
        .token_provider
        .validate_token(&session.access_token)
        .unwrap();
    assert_eq!(claims.sub, session.account.id);
    assert_eq!(claims.email, "login@example.com");
    assert!(!claims.is_admin());

    // last_login is stamped
    let account = backend
        .user_store
        .find_by_id(&session.account.id)
        .await
        .unwrap()
        .unwrap();
    assert!(account.last_login.is_some());
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let backend = setup_offline_backend().await;
    backend
        .auth_service
        .signup(signup_request("login@example.com"))
        .await
        .unwrap();

    assert!(matches!(
        backend
            .auth_service
            .login("login@example.com", "wrong-password")
            .await,
        Err(AuthError::InvalidCredentials(_))
    ));
    assert!(matches!(
        backend
            .auth_service
            .login("ghost@example.com", "initial-password-1")
            .await,
        Err(AuthError::InvalidCredentials(_))
    ));
}

#[tokio::test]
async fn test_deactivated_account_cannot_login() {
    let backend = setup_offline_backend().await;
    let session = backend
        .auth_service
        .signup(signup_request("gone@example.com"))
        .await
        .unwrap();

    backend
        .user_store
        .deactivate(&session.account.id, "admin-x")
        .await
        .unwrap();

    assert!(matches!(
        backend
            .auth_service
            .login("gone@example.com", "initial-password-1")
            .await,
        Err(AuthError::AccountDisabled(_))
    ));
}

#[tokio::test]
async fn test_whoami_and_profile_update() {
    let backend = setup_offline_backend().await;
    let session = backend
        .auth_service
        .signup(signup_request("me@example.com"))
        .await
        .unwrap();
    let ctx = ctx_for(&session.account);

    let me = backend.auth_service.whoami(&ctx).await.unwrap();
    assert_eq!(me.id, session.account.id);

    let updated = backend
        .auth_service
        .update_profile(
            &ctx,
            UpdateProfileRequest {
                display_name: Some("Renamed".to_string()),
                agent_id: Some("agent-9".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.agent_id.as_deref(), Some("agent-9"));
    // Untouched fields survive
    assert_eq!(updated.phone_number, "555-0300");
}

#[tokio::test]
async fn test_whoami_without_identity_is_unauthenticated() {
    let backend = setup_offline_backend().await;
    assert!(matches!(
        backend.auth_service.whoami(&anonymous_ctx()).await,
        Err(AuthError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let backend = setup_offline_backend().await;
    let session = backend
        .auth_service
        .signup(signup_request("change@example.com"))
        .await
        .unwrap();
    let ctx = ctx_for(&session.account);

    assert!(matches!(
        backend
            .auth_service
            .change_password(&ctx, "wrong-current", "next-password-1")
            .await,
        Err(AuthError::InvalidCredentials(_))
    ));

    backend
        .auth_service
        .change_password(&ctx, "initial-password-1", "next-password-1")
        .await
        .unwrap();

    // Old password no longer works, new one does
    assert!(backend
        .auth_service
        .login("change@example.com", "initial-password-1")
        .await
        .is_err());
    assert!(backend
        .auth_service
        .login("change@example.com", "next-password-1")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_reset_flow_end_to_end() {
    let backend = setup_offline_backend().await;
    backend
        .auth_service
        .signup(signup_request("reset@example.com"))
        .await
        .unwrap();

    backend
        .auth_service
        .request_password_reset("reset@example.com")
        .await
        .unwrap();
    assert_eq!(backend.mailer.sent_count(), 1);
    let token = backend.mailer.last_token().unwrap();

    backend
        .auth_service
        .reset_password(&token, "reset-password-1")
        .await
        .unwrap();

    assert!(backend
        .auth_service
        .login("reset@example.com", "reset-password-1")
        .await
        .is_ok());

    // Tokens are single-use
    assert!(matches!(
        backend
            .auth_service
            .reset_password(&token, "another-password-1")
            .await,
        Err(AuthError::Validation(_))
    ));
}

#[tokio::test]
async fn test_reset_request_for_unknown_email_is_silently_accepted() {
    let backend = setup_offline_backend().await;

    backend
        .auth_service
        .request_password_reset("ghost@example.com")
        .await
        .unwrap();

    assert_eq!(backend.mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_reset_rejects_garbage_token() {
    let backend = setup_offline_backend().await;
    assert!(matches!(
        backend
            .auth_service
            .reset_password("made-up-token", "valid-password-1")
            .await,
        Err(AuthError::Validation(_))
    ));
}

#[tokio::test]
async fn test_own_api_key_set_and_masked_read() {
    let backend = setup_offline_backend().await;
    let session = backend
        .auth_service
        .signup(signup_request("keys@example.com"))
        .await
        .unwrap();
    let ctx = ctx_for(&session.account);

    assert!(matches!(
        backend.auth_service.get_own_api_key_masked(&ctx).await,
        Err(AuthError::CredentialMissing(_))
    ));

    backend
        .auth_service
        .set_own_api_key(&ctx, "sk-live-mine-1234")
        .await
        .unwrap();

    let masked = backend
        .auth_service
        .get_own_api_key_masked(&ctx)
        .await
        .unwrap();
    assert!(masked.masked_key.ends_with("1234"));
    assert!(!masked.masked_key.contains("sk-live"));
}
