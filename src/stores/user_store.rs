use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::auth::Role;

/// Fields for provisioning a new login identity
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub phone_number: String,
    pub business_name: String,
    pub role: Role,
    pub agent_id: Option<String>,
    pub created_by: Option<String>,
}

/// Merge-patch for a user record; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub business_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub agent_id: Option<String>,
}

impl UserUpdate {
    /// Names of the fields this patch touches, for the audit trail
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.display_name.is_some() {
            names.push("display_name".to_string());
        }
        if self.phone_number.is_some() {
            names.push("phone_number".to_string());
        }
        if self.business_name.is_some() {
            names.push("business_name".to_string());
        }
        if self.role.is_some() {
            names.push("role".to_string());
        }
        if self.is_active.is_some() {
            names.push("is_active".to_string());
        }
        if self.agent_id.is_some() {
            names.push("agent_id".to_string());
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }
}

/// Repository for login identities and profile records
///
/// Password hashes are argon2id with a process-wide pepper as the keyed
/// secret, so hashes are not verifiable outside this deployment.
pub struct UserStore {
    db: DatabaseConnection,
    pepper: String,
}

impl UserStore {
    pub fn new(db: DatabaseConnection, pepper: String) -> Self {
        Self { db, pepper }
    }

    fn hasher(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::parse("argon2_params", e.to_string()))
    }

    fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::parse("password_hash", e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Provision a new login identity and profile record
    ///
    /// The caller is responsible for duplicate-email checks; the unique
    /// index is the last line of defense.
    pub async fn create_login(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let row = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(new_user.email),
            password_hash: Set(self.hash_password(&new_user.password)?),
            display_name: Set(new_user.display_name),
            phone_number: Set(new_user.phone_number),
            business_name: Set(new_user.business_name),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(true),
            agent_id: Set(new_user.agent_id),
            created_at: Set(now),
            created_by: Set(new_user.created_by),
            last_login: Set(None),
            updated_at: Set(now),
            updated_by: Set(None),
            deactivated_at: Set(None),
            deactivated_by: Set(None),
        };

        let model = row
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("create_login", e))?;

        Ok(model)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// All user records, including deactivated ones, oldest first
    pub async fn list_all(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Active (non-deactivated) user records, oldest first
    pub async fn list_active(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_active_users", e))
    }

    /// Verify an email/password pair
    ///
    /// Returns the matching record on success, `None` when the account is
    /// absent or the password does not verify. The two cases are
    /// indistinguishable to the caller.
    pub async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        let Some(account) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let parsed = match PasswordHash::new(&account.password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Err(InternalError::parse("password_hash", e.to_string()));
            }
        };

        if self
            .hasher()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    /// Stamp last_login after a successful authentication
    pub async fn touch_last_login(&self, id: &str) -> Result<(), InternalError> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(());
        };
        let mut active: user::ActiveModel = account.into();
        active.last_login = Set(Some(Utc::now().timestamp()));
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("touch_last_login", e))?;
        Ok(())
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: &str, new_password: &str) -> Result<(), InternalError> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(());
        };
        let mut active: user::ActiveModel = account.into();
        active.password_hash = Set(self.hash_password(new_password)?);
        active.updated_at = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_password", e))?;
        Ok(())
    }

    /// Merge a partial update into a user record, stamping the actor and
    /// time. Returns `None` when the record does not exist.
    pub async fn apply_update(
        &self,
        id: &str,
        update: UserUpdate,
        actor_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = account.into();
        if let Some(display_name) = update.display_name {
            active.display_name = Set(display_name);
        }
        if let Some(phone_number) = update.phone_number {
            active.phone_number = Set(phone_number);
        }
        if let Some(business_name) = update.business_name {
            active.business_name = Set(business_name);
        }
        if let Some(role) = update.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(agent_id) = update.agent_id {
            active.agent_id = Set(Some(agent_id));
        }
        active.updated_at = Set(Utc::now().timestamp());
        active.updated_by = Set(Some(actor_id.to_string()));

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_user", e))?;

        Ok(Some(model))
    }

    /// Soft-delete a user record. Returns `None` when the record does not
    /// exist. The row itself is never removed.
    pub async fn deactivate(
        &self,
        id: &str,
        actor_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().timestamp();
        let mut active: user::ActiveModel = account.into();
        active.is_active = Set(false);
        active.deactivated_at = Set(Some(now));
        active.deactivated_by = Set(Some(actor_id.to_string()));
        active.updated_at = Set(now);
        active.updated_by = Set(Some(actor_id.to_string()));

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("deactivate_user", e))?;

        Ok(Some(model))
    }

    /// Whether any active admin account exists (startup bootstrap check)
    pub async fn admin_exists(&self) -> Result<bool, InternalError> {
        let admin = User::find()
            .filter(user::Column::Role.eq(Role::Admin.as_str()))
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin", e))?;
        Ok(admin.is_some())
    }
}
