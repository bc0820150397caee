//! UserStore trait definition.

use axis_types::error::RepositoryError;
use axis_types::user::{NewUser, User};

/// Repository trait for registered accounts.
///
/// Emails are stored normalized; a duplicate email fails with
/// [`RepositoryError::Conflict`] naming the `email` field.
pub trait UserStore: Send + Sync {
    fn create_user(
        &self,
        user: NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
