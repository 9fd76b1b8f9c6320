mod common;

use common::*;
use voicedash_backend::errors::UsersError;
use voicedash_backend::types::dto::user::{CreateUserRequest, UpdateUserRequest};

fn create_request(email: &str, send_welcome: bool) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        display_name: "New User".to_string(),
        phone_number: "555-0200".to_string(),
        business_name: Some("Acme".to_string()),
        role: "user".to_string(),
        agent_id: Some("agent-7".to_string()),
        api_key: "sk-live-provisioned".to_string(),
        send_welcome_email: send_welcome,
    }
}

#[tokio::test]
async fn test_every_directory_operation_is_forbidden_for_non_admins() {
    let backend = setup_offline_backend().await;
    let user = create_user(&backend, "plain@example.com").await;
    let ctx = ctx_for(&user);

    assert!(matches!(
        backend.directory_service.list_users(&ctx).await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend.directory_service.get_user(&ctx, &user.id).await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend
            .directory_service
            .create_user(&ctx, create_request("new@example.com", false))
            .await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend
            .directory_service
            .update_user(&ctx, &user.id, UpdateUserRequest::default())
            .await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend.directory_service.deactivate_user(&ctx, &user.id).await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend
            .directory_service
            .reset_user_password(&ctx, "plain@example.com")
            .await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend
            .directory_service
            .set_user_api_key(&ctx, &user.id, "sk-live-x")
            .await,
        Err(UsersError::Forbidden(_))
    ));
    assert!(matches!(
        backend.directory_service.get_user_api_key(&ctx, &user.id).await,
        Err(UsersError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_operations_without_identity_are_unauthenticated() {
    let backend = setup_offline_backend().await;
    let ctx = anonymous_ctx();

    assert!(matches!(
        backend.directory_service.list_users(&ctx).await,
        Err(UsersError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn test_create_user_provisions_login_credential_and_usage_record() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let ctx = ctx_for(&admin);

    let account = backend
        .directory_service
        .create_user(&ctx, create_request("new@example.com", false))
        .await
        .unwrap();

    assert_eq!(account.email, "new@example.com");
    assert_eq!(account.role, "user");
    assert!(account.is_active);
    assert_eq!(account.created_by.as_deref(), Some(admin.id.as_str()));

    // Credential decrypts back to the provisioned key
    let credential = backend
        .credential_store
        .get_credential(&account.id)
        .await
        .unwrap()
        .expect("credential should exist");
    assert_eq!(credential.plaintext, "sk-live-provisioned");

    // Usage record exists, zeroed, with empty history
    let usage = backend
        .usage_store
        .get(&account.id)
        .await
        .unwrap()
        .expect("usage record should exist");
    assert_eq!(usage.total_minutes_used, 0.0);
    assert_eq!(usage.credits_left, 0);
    assert!(usage.history.is_empty());

    assert_eq!(count_audit_entries(&backend, "create_user").await, 1);
}

#[tokio::test]
async fn test_create_user_without_welcome_sends_no_email() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let ctx = ctx_for(&admin);

    backend
        .directory_service
        .create_user(&ctx, create_request("new@example.com", false))
        .await
        .unwrap();

    assert_eq!(backend.mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_create_user_with_welcome_sends_one_email() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let ctx = ctx_for(&admin);

    backend
        .directory_service
        .create_user(&ctx, create_request("new@example.com", true))
        .await
        .unwrap();

    assert_eq!(backend.mailer.sent_count(), 1);
    let sent = backend.mailer.sent.lock().unwrap();
    assert_eq!(sent[0].0, "new@example.com");
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_email() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let ctx = ctx_for(&admin);

    create_user(&backend, "taken@example.com").await;

    let result = backend
        .directory_service
        .create_user(&ctx, create_request("taken@example.com", false))
        .await;
    assert!(matches!(result, Err(UsersError::Conflict(_))));
}

#[tokio::test]
async fn test_create_user_rejects_bad_email_and_role() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let ctx = ctx_for(&admin);

    let mut bad_email = create_request("not-an-email", false);
    bad_email.email = "not-an-email".to_string();
    assert!(matches!(
        backend.directory_service.create_user(&ctx, bad_email).await,
        Err(UsersError::Validation(_))
    ));

    let mut bad_role = create_request("ok@example.com", false);
    bad_role.role = "superuser".to_string();
    assert!(matches!(
        backend.directory_service.create_user(&ctx, bad_role).await,
        Err(UsersError::Validation(_))
    ));
}

#[tokio::test]
async fn test_update_user_merges_fields_and_stamps_actor() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let target = create_user(&backend, "target@example.com").await;
    let ctx = ctx_for(&admin);

    let updated = backend
        .directory_service
        .update_user(
            &ctx,
            &target.id,
            UpdateUserRequest {
                display_name: Some("Renamed".to_string()),
                role: Some("admin".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.display_name, "Renamed");
    assert_eq!(updated.role, "admin");
    // Untouched fields survive the merge
    assert_eq!(updated.phone_number, target.phone_number);
    assert_eq!(updated.updated_by.as_deref(), Some(admin.id.as_str()));
    assert!(updated.updated_at >= target.updated_at);

    assert_eq!(count_audit_entries(&backend, "update_user").await, 1);
}

#[tokio::test]
async fn test_update_unknown_user_is_not_found() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let ctx = ctx_for(&admin);

    let result = backend
        .directory_service
        .update_user(
            &ctx,
            "ghost",
            UpdateUserRequest {
                display_name: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(UsersError::NotFound(_))));
}

#[tokio::test]
async fn test_deactivate_is_a_soft_delete_with_audit_entry() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let target = create_user(&backend, "target@example.com").await;
    let ctx = ctx_for(&admin);

    backend
        .directory_service
        .deactivate_user(&ctx, &target.id)
        .await
        .unwrap();

    // The record still exists, flagged inactive
    let account = backend
        .directory_service
        .get_user(&ctx, &target.id)
        .await
        .unwrap();
    assert!(!account.is_active);
    assert_eq!(account.deactivated_by.as_deref(), Some(admin.id.as_str()));
    assert!(account.deactivated_at.is_some());

    let entry = latest_audit_entry(&backend).await.unwrap();
    assert_eq!(entry.action, "deactivate_user");
    assert_eq!(entry.target_user_id.as_deref(), Some(target.id.as_str()));
}

#[tokio::test]
async fn test_list_users_includes_deactivated_accounts() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let target = create_user(&backend, "target@example.com").await;
    let ctx = ctx_for(&admin);

    backend
        .directory_service
        .deactivate_user(&ctx, &target.id)
        .await
        .unwrap();

    let users = backend.directory_service.list_users(&ctx).await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_admin_reset_password_sends_email_and_audits() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let target = create_user(&backend, "target@example.com").await;
    let ctx = ctx_for(&admin);

    backend
        .directory_service
        .reset_user_password(&ctx, "target@example.com")
        .await
        .unwrap();

    assert_eq!(backend.mailer.sent_count(), 1);
    assert_eq!(count_audit_entries(&backend, "reset_password").await, 1);
    let entry = latest_audit_entry(&backend).await.unwrap();
    assert_eq!(entry.target_user_id.as_deref(), Some(target.id.as_str()));
}

#[tokio::test]
async fn test_admin_rotates_and_reads_user_api_key() {
    let backend = setup_offline_backend().await;
    let admin = create_admin(&backend, "admin@example.com").await;
    let target = create_user(&backend, "target@example.com").await;
    let ctx = ctx_for(&admin);

    backend
        .directory_service
        .set_user_api_key(&ctx, &target.id, "sk-live-rotated")
        .await
        .unwrap();

    let masked = backend
        .directory_service
        .get_user_api_key(&ctx, &target.id)
        .await
        .unwrap();
    assert!(masked.masked_key.ends_with("ated"));
    assert!(masked.masked_key.starts_with('*'));

    assert_eq!(count_audit_entries(&backend, "rotate_api_key").await, 1);
}
