#[allow(clippy::module_inception)]
pub mod core_auth;
pub mod error;
pub mod helper;

use async_trait::async_trait;
use std::fmt::Debug;

pub use error::AuthError;
pub use helper::PasswdValidator;

/// Decides whether a username, and then its password, are accepted.
///
/// Each check resolves exactly once to accept (`Ok`) or reject (`Err`).
#[async_trait]
pub trait CredentialValidator: Send + Sync + Debug {
    async fn check_user(&self, username: &str) -> Result<(), AuthError>;

    async fn check_password(&self, username: &str, password: &str) -> Result<(), AuthError>;
}
