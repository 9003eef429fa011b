use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::prelude::*;
use crate::ids::{ProfileId, UserId};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("fatal database error")]
    DbError(#[from] sea_orm::DbErr),
    #[error("failed to process credential")]
    Credential(#[from] bcrypt::BcryptError),
}

/// Fields collected by the registration form. `Default` doubles as the blank
/// user (with attached blank profile) handed to the form on GET.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

/// Password policy: at least 3 characters, containing at least one letter,
/// one digit and one character that is neither, anywhere in the string.
/// Class presence only; the rest of the password is unconstrained.
pub fn is_valid_password(password: &str) -> bool {
    if password.is_empty() || password.chars().count() < 3 {
        return false;
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_other = password.chars().any(|c| !c.is_ascii_alphanumeric());
    has_letter && has_digit && has_other
}

#[derive(Clone)]
pub struct UsersService {
    db: DatabaseConnection,
}

impl UsersService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist a new user and their profile in one transaction.
    ///
    /// The caller has already applied the password policy; this stores a
    /// bcrypt hash of whatever it is given. Username collisions surface as
    /// `DbError` from the unique index.
    pub async fn register(&self, new_user: NewUser) -> Result<UserModel, UsersServiceError> {
        let password_hash = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)?;

        let txn = self.db.begin().await?;

        let user = UserActiveModel {
            id: Set(UserId::new()),
            username: Set(new_user.username),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&txn)
        .await?;

        UserProfileActiveModel {
            id: Set(ProfileId::new()),
            user_id: Set(user.id),
            full_name: Set(new_user.full_name),
            email_address: Set(new_user.email_address),
            mobile_number: Set(new_user.mobile_number),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(user)
    }

    /// Credential check. Unknown username and wrong password are deliberately
    /// indistinguishable to the caller.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserModel>, UsersServiceError> {
        let user = User::find()
            .filter(UserColumn::Username.eq(username))
            .one(&self.db)
            .await?;

        match user {
            Some(user) if bcrypt::verify(password, &user.password_hash).unwrap_or(false) => {
                Ok(Some(user))
            }
            _ => Ok(None),
        }
    }

    /// Profile fetch is an explicit second query, on demand.
    pub async fn profile_for(
        &self,
        user: &UserModel,
    ) -> Result<Option<UserProfileModel>, UsersServiceError> {
        Ok(user.find_related(UserProfile).one(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            full_name: "Test User".to_string(),
            email_address: "test@example.com".to_string(),
            mobile_number: "5550100".to_string(),
        }
    }

    #[test]
    fn password_with_all_three_classes_is_accepted() {
        assert!(is_valid_password("ab1!"));
        assert!(is_valid_password("!1a"));
        assert!(is_valid_password("x9 z")); // space counts as "neither"
        assert!(is_valid_password("longer-password-1"));
    }

    #[test]
    fn password_shorter_than_three_chars_is_rejected() {
        assert!(!is_valid_password(""));
        assert!(!is_valid_password("a1"));
        assert!(!is_valid_password("a!"));
    }

    #[test]
    fn password_missing_a_class_is_rejected() {
        assert!(!is_valid_password("abcdef")); // no digit, no symbol
        assert!(!is_valid_password("abc123")); // no symbol
        assert!(!is_valid_password("123!@#")); // no letter
        assert!(!is_valid_password("!!!???")); // symbols only
    }

    #[tokio::test]
    async fn register_then_login_returns_the_user() {
        let db = setup_test_db().await;
        let service = UsersService::new(db);

        let registered = service.register(new_user("alice", "pass1!")).await.unwrap();
        assert_eq!(registered.username, "alice");

        let logged_in = service.login("alice", "pass1!").await.unwrap();
        assert_eq!(logged_in.map(|u| u.id), Some(registered.id));
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_wrong_password() {
        let db = setup_test_db().await;
        let service = UsersService::new(db);

        service.register(new_user("bob", "pass1!")).await.unwrap();

        assert!(service.login("nobody", "pass1!").await.unwrap().is_none());
        assert!(service.login("bob", "wrong1!").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let db = setup_test_db().await;
        let service = UsersService::new(db);

        let user = service.register(new_user("carol", "pass1!")).await.unwrap();
        assert_ne!(user.password_hash, "pass1!");
        assert!(bcrypt::verify("pass1!", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_creates_the_profile_alongside_the_user() {
        let db = setup_test_db().await;
        let service = UsersService::new(db);

        let user = service.register(new_user("dave", "pass1!")).await.unwrap();
        let profile = service.profile_for(&user).await.unwrap().unwrap();

        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.full_name, "Test User");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let db = setup_test_db().await;
        let service = UsersService::new(db);

        service.register(new_user("erin", "pass1!")).await.unwrap();
        let result = service.register(new_user("erin", "other2@")).await;

        assert!(matches!(result, Err(UsersServiceError::DbError(_))));
    }
}
