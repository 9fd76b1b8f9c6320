use std::sync::Arc;

use crate::errors::UsageError;
use crate::providers::voice_provider::SubscriptionInfo;
use crate::providers::VoiceProviderClient;
use crate::stores::{CredentialStore, UsageStore, UserStore};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;
use crate::types::internal::usage::{UsageMetrics, UsageSnapshot};

/// Ten minutes of remaining audio per credit
const MINUTES_PER_CREDIT: f64 = 10.0;

/// Derive dashboard metrics from a provider subscription response
///
/// The provider reports character counts; the dashboard shows minutes and
/// credits. The conversion is a fixed linear transform with a configured
/// characters-per-minute constant.
pub fn compute_usage(subscription: &SubscriptionInfo, chars_per_minute: f64) -> UsageMetrics {
    let total_minutes_used = subscription.character_count as f64 / chars_per_minute;
    let minutes_remaining =
        (subscription.character_limit - subscription.character_count) as f64 / chars_per_minute;
    let credits_left = (minutes_remaining / MINUTES_PER_CREDIT).floor() as i64;

    UsageMetrics {
        total_minutes_used,
        minutes_remaining,
        credits_left,
    }
}

/// Fetches consumption metrics from the voice provider and maintains the
/// per-user usage record with its capped history
pub struct UsageService {
    user_store: Arc<UserStore>,
    credential_store: Arc<CredentialStore>,
    usage_store: Arc<UsageStore>,
    voice_client: Arc<VoiceProviderClient>,
    chars_per_minute: f64,
}

impl UsageService {
    pub fn new(
        user_store: Arc<UserStore>,
        credential_store: Arc<CredentialStore>,
        usage_store: Arc<UsageStore>,
        voice_client: Arc<VoiceProviderClient>,
        chars_per_minute: f64,
    ) -> Self {
        Self {
            user_store,
            credential_store,
            usage_store,
            voice_client,
            chars_per_minute,
        }
    }

    fn require_auth<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Claims, UsageError> {
        ctx.claims.as_ref().ok_or_else(UsageError::unauthenticated)
    }

    fn require_admin<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Claims, UsageError> {
        let claims = self.require_auth(ctx)?;
        if !claims.is_admin() {
            return Err(UsageError::forbidden());
        }
        Ok(claims)
    }

    /// Refresh and return the caller's own usage record
    pub async fn fetch_for_self(&self, ctx: &RequestContext) -> Result<UsageSnapshot, UsageError> {
        let claims = self.require_auth(ctx)?;
        let owner_id = claims.sub.clone();
        self.refresh(&owner_id).await
    }

    /// Refresh and return another account's usage record
    pub async fn fetch_for_user(
        &self,
        ctx: &RequestContext,
        target_id: &str,
    ) -> Result<UsageSnapshot, UsageError> {
        self.require_admin(ctx)?;

        if self.user_store.find_by_id(target_id).await?.is_none() {
            return Err(UsageError::not_found(target_id));
        }

        self.refresh(target_id).await
    }

    /// Previously persisted usage records for every active account
    ///
    /// Never re-calls the provider: one admin dashboard load must not fan
    /// out into per-user upstream requests.
    pub async fn fetch_all_users(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<UsageSnapshot>, UsageError> {
        self.require_admin(ctx)?;

        let owner_ids: Vec<String> = self
            .user_store
            .list_active()
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect();

        Ok(self.usage_store.list_for_owners(&owner_ids).await?)
    }

    /// Call the provider with the owner's credential, derive metrics, and
    /// persist one history entry
    async fn refresh(&self, owner_id: &str) -> Result<UsageSnapshot, UsageError> {
        let credential = self
            .credential_store
            .get_credential(owner_id)
            .await?
            .ok_or_else(|| UsageError::credential_missing(owner_id))?;

        let subscription = self
            .voice_client
            .account_subscription(&credential.plaintext)
            .await
            .map_err(|e| UsageError::provider(&e))?;

        let metrics = compute_usage(&subscription, self.chars_per_minute);
        let snapshot = self.usage_store.record_snapshot(owner_id, metrics).await?;

        tracing::debug!(
            "Usage refreshed for {}: {:.1} min used, {} credits left",
            owner_id,
            snapshot.total_minutes_used,
            snapshot.credits_left
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_usage_reference_values() {
        let subscription = SubscriptionInfo {
            character_count: 5000,
            character_limit: 10000,
        };
        let metrics = compute_usage(&subscription, 1000.0);

        assert_eq!(metrics.total_minutes_used, 5.0);
        assert_eq!(metrics.minutes_remaining, 5.0);
        assert_eq!(metrics.credits_left, 0);
    }

    #[test]
    fn test_compute_usage_credits_floor() {
        let subscription = SubscriptionInfo {
            character_count: 1000,
            character_limit: 200_000,
        };
        // 199 minutes remaining -> 19 credits, not 19.9
        let metrics = compute_usage(&subscription, 1000.0);
        assert_eq!(metrics.minutes_remaining, 199.0);
        assert_eq!(metrics.credits_left, 19);
    }

    #[test]
    fn test_compute_usage_exhausted_quota() {
        let subscription = SubscriptionInfo {
            character_count: 10000,
            character_limit: 10000,
        };
        let metrics = compute_usage(&subscription, 1000.0);
        assert_eq!(metrics.minutes_remaining, 0.0);
        assert_eq!(metrics.credits_left, 0);
    }

    #[test]
    fn test_compute_usage_respects_chars_per_minute() {
        let subscription = SubscriptionInfo {
            character_count: 5000,
            character_limit: 10000,
        };
        let metrics = compute_usage(&subscription, 500.0);
        assert_eq!(metrics.total_minutes_used, 10.0);
        assert_eq!(metrics.minutes_remaining, 10.0);
        assert_eq!(metrics.credits_left, 1);
    }
}
