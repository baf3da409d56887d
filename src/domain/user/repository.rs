//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user (id assigned by the caller)
    async fn create(&self, user: User) -> DomainResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Find user by email (unique)
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
}
