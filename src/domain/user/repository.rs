use async_trait::async_trait;

use super::{CreateUserDto, User, UserRole};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn count_users(&self) -> DomainResult<u64>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Active accounts ordered by username
    async fn list_users(&self) -> DomainResult<Vec<User>>;

    async fn record_login(&self, id: &str) -> DomainResult<()>;
    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn update_user_role(&self, id: &str, role: UserRole) -> DomainResult<User>;

    /// Fails with `NotFound` when no account has the id
    async fn delete_user(&self, id: &str) -> DomainResult<()>;
}
