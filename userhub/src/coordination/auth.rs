use subtle::ConstantTimeEq;

use crate::coordination::errors::CoordinationError;
use crate::token::issue_token;
use crate::userdb::UserStore;

/// Authenticate a username and password, returning a signed bearer
/// token.
///
/// An unknown username and a wrong password are indistinguishable to
/// the caller, and the password comparison is constant-time.
pub async fn login(username: &str, password: &str) -> Result<String, CoordinationError> {
    let Some(credentials) = UserStore::get_user_by_username(username).await? else {
        return Err(CoordinationError::InvalidCredentials.log());
    };

    let matches: bool = credentials
        .password
        .as_bytes()
        .ct_eq(password.as_bytes())
        .into();
    if !matches {
        return Err(CoordinationError::InvalidCredentials.log());
    }

    let token = issue_token(credentials.id, &credentials.role)
        .map_err(|e| CoordinationError::Internal(e.to_string()).log())?;

    tracing::info!(user_id = credentials.id, "Login successful");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::coordination::user::create_user;
    use crate::test_utils::init_test_environment;
    use crate::token::verify_token;

    fn unique(prefix: &str) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Clock before epoch")
            .as_nanos();
        format!("{prefix}{nanos}")
    }

    #[tokio::test]
    #[serial]
    async fn test_login_issues_verifiable_token() {
        init_test_environment().await;

        let username = unique("login");
        let email = format!("{username}@example.com");
        let created = create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user");

        let token = login(&username, "Passw0rd!x").await.expect("Login failed");
        let claims = verify_token(&token).expect("Token should verify");
        assert_eq!(claims.id, created.id);
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    #[serial]
    async fn test_wrong_password_is_invalid_credentials() {
        init_test_environment().await;

        let username = unique("loginbad");
        let email = format!("{username}@example.com");
        create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user");

        let result = login(&username, "WrongPass1!").await;
        assert_eq!(result.unwrap_err(), CoordinationError::InvalidCredentials);
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_user_is_invalid_credentials() {
        init_test_environment().await;

        let result = login("no-such-user-anywhere", "Passw0rd!x").await;
        assert_eq!(result.unwrap_err(), CoordinationError::InvalidCredentials);
    }
}
