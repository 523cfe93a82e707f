//! User management service
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use bcrypt::DEFAULT_COST;
use tracing::info;

use crate::domain::{CreateUserDto, DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Login, registration and the bootstrap admin account.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    hash_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            repos,
            jwt_config,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate user by username/email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        // Try username first, then email
        let users = self.repos.users();
        let user = match users.get_user_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => users.get_user_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        users.record_login(&user.id).await?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new staff account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        if username.len() < 3 || username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let users = self.repos.users();
        if users.get_user_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if users.get_user_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password_with_cost(password, self.hash_cost)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        let user = users
            .create_user(CreateUserDto {
                username: username.to_string(),
                email: email.to_string(),
                role,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, role = role.as_str(), "New user registered");
        Ok(user)
    }

    /// Create the administrator account when no user exists yet.
    /// Returns whether an account was created.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(false);
        }
        self.register(username, email, password, UserRole::Admin)
            .await?;
        Ok(true)
    }

    // ── Password ────────────────────────────────────────────────

    /// Replace the caller's password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> DomainResult<()> {
        if new_password != confirm_new_password {
            return Err(DomainError::Validation("New passwords do not match".into()));
        }
        if new_password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }

        let users = self.repos.users();
        let user = users
            .get_user_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| user_not_found(user_id))?;

        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Validation(
                "Current password is incorrect".into(),
            ));
        }

        let password_hash = hash_password_with_cost(new_password, self.hash_cost)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
        users.update_user_password(&user.id, &password_hash).await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list_users().await
    }

    /// Active account by id
    pub async fn get_active_user(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self
            .repos
            .users()
            .get_user_by_id(id)
            .await?
            .filter(|u| u.is_active))
    }

    pub async fn set_role(&self, id: &str, role: UserRole) -> DomainResult<User> {
        if self.get_active_user(id).await?.is_none() {
            return Err(user_not_found(id));
        }
        let user = self.repos.users().update_user_role(id, role).await?;
        info!(user_id = %user.id, role = role.as_str(), "User role updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.repos.users().delete_user(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.repos.users().get_user_by_id(id).await
    }
}

fn user_not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "User",
        field: "id",
        value: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            JwtConfig::new("test-secret", 8),
        )
        .with_hash_cost(4)
    }

    #[tokio::test]
    async fn register_then_login_by_username_or_email() {
        let service = service();
        let user = service
            .register("frontdesk", "desk@hotel.com", "password123", UserRole::Receptionist)
            .await
            .unwrap();
        assert_ne!(user.password_hash, "password123");

        let auth = service.login("frontdesk", "password123").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 8 * 3600);
        let claims = verify_token(&auth.token, &JwtConfig::new("test-secret", 8)).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.user_role(), Some(UserRole::Receptionist));

        assert!(service.login("desk@hotel.com", "password123").await.is_ok());
        let stored = service.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let service = service();
        service
            .register("manager", "manager@hotel.com", "password123", UserRole::Manager)
            .await
            .unwrap();
        assert!(matches!(
            service.login("manager", "password124").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.login("nobody", "password123").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn registration_rules() {
        let service = service();
        assert!(matches!(
            service.register("ab", "a@b.c", "password123", UserRole::Manager).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.register("abc", "a@b.c", "short", UserRole::Manager).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.register("abc", "no-at-sign", "password123", UserRole::Manager).await,
            Err(DomainError::Validation(_))
        ));

        service
            .register("abc", "a@b.c", "password123", UserRole::Manager)
            .await
            .unwrap();
        assert!(matches!(
            service.register("abc", "x@b.c", "password123", UserRole::Manager).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            service.register("abd", "a@b.c", "password123", UserRole::Manager).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn default_admin_is_created_once() {
        let service = service();
        assert!(service
            .ensure_default_admin("admin", "admin@hotel.com", "admin12345")
            .await
            .unwrap());
        assert!(!service
            .ensure_default_admin("admin2", "admin2@hotel.com", "admin12345")
            .await
            .unwrap());

        let auth = service.login("admin@hotel.com", "admin12345").await.unwrap();
        assert_eq!(auth.user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn change_password_checks_current_and_confirmation() {
        let service = service();
        let user = service
            .register("frontdesk", "desk@hotel.com", "password123", UserRole::Receptionist)
            .await
            .unwrap();

        assert!(matches!(
            service
                .change_password(&user.id, "password123", "newpassword1", "newpassword2")
                .await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service
                .change_password(&user.id, "wrong-password", "newpassword1", "newpassword1")
                .await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.change_password(&user.id, "password123", "short", "short").await,
            Err(DomainError::Validation(_))
        ));
        assert!(service.change_password("nobody", "a", "newpassword1", "newpassword1").await.unwrap_err().is_not_found());

        service
            .change_password(&user.id, "password123", "newpassword1", "newpassword1")
            .await
            .unwrap();
        assert!(service.login("frontdesk", "password123").await.is_err());
        assert!(service.login("frontdesk", "newpassword1").await.is_ok());
    }

    #[tokio::test]
    async fn administration_lists_retypes_and_deletes() {
        let service = service();
        let desk = service
            .register("frontdesk", "desk@hotel.com", "password123", UserRole::Receptionist)
            .await
            .unwrap();
        service
            .register("admin", "admin@hotel.com", "password123", UserRole::Admin)
            .await
            .unwrap();

        let names: Vec<String> = service
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["admin", "frontdesk"]);

        let promoted = service.set_role(&desk.id, UserRole::Manager).await.unwrap();
        assert_eq!(promoted.role, UserRole::Manager);
        let auth = service.login("frontdesk", "password123").await.unwrap();
        assert_eq!(auth.user.role, UserRole::Manager);

        service.delete_user(&desk.id).await.unwrap();
        assert!(service.get_active_user(&desk.id).await.unwrap().is_none());
        assert!(service.delete_user(&desk.id).await.unwrap_err().is_not_found());
        assert!(service
            .set_role(&desk.id, UserRole::Admin)
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }
}
