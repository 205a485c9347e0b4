use crate::coordination::errors::CoordinationError;
use crate::userdb::{UserStore, UserWithRole};

/// Create a user account with its password secret
pub async fn create_user(
    username: &str,
    email: &str,
    password: &str,
) -> Result<UserWithRole, CoordinationError> {
    let user = UserStore::create_user(username, email, password).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok(user)
}

pub async fn update_user(
    id: i64,
    username: &str,
    email: &str,
) -> Result<UserWithRole, CoordinationError> {
    let user = UserStore::update_user(id, username, email).await?;
    tracing::info!(user_id = user.id, "User updated");
    Ok(user)
}

/// Replace the stored password, returning the user's role
pub async fn update_password(id: i64, password: &str) -> Result<String, CoordinationError> {
    let role = UserStore::patch_password(id, password).await?;
    tracing::info!(user_id = id, "Password updated");
    Ok(role)
}

pub async fn delete_user(id: i64) -> Result<(), CoordinationError> {
    UserStore::delete_user(id).await?;
    tracing::info!(user_id = id, "User deleted");
    Ok(())
}

/// All users; an empty table is reported as an error, matching the
/// list endpoint contract.
pub async fn get_users() -> Result<Vec<UserWithRole>, CoordinationError> {
    let users = UserStore::get_users().await?;
    if users.is_empty() {
        return Err(CoordinationError::EmptyResult("No users found".to_string()).log());
    }
    Ok(users)
}

pub async fn get_user_by_id(id: i64) -> Result<UserWithRole, CoordinationError> {
    UserStore::get_user_by_id(id)
        .await?
        .ok_or_else(|| CoordinationError::UserNotFound.log())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::init_test_environment;

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
    async fn test_create_then_list_users() {
        init_test_environment().await;

        let username = unique("svc");
        let email = format!("{username}@example.com");
        let created = create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user");

        let users = get_users().await.expect("Failed to list users");
        assert!(users.iter().any(|u| u.id == created.id));
    }

    #[tokio::test]
    #[serial]
    async fn test_duplicate_email_classifies() {
        init_test_environment().await;

        let username = unique("svcdup");
        let email = format!("{username}@example.com");
        create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user");

        let result = create_user(&unique("svcdup2"), &email, "Passw0rd!x").await;
        assert_eq!(result.unwrap_err(), CoordinationError::EmailExists);
    }

    #[tokio::test]
    #[serial]
    async fn test_get_missing_user_is_not_found() {
        init_test_environment().await;

        let result = get_user_by_id(i64::MAX).await;
        assert_eq!(result.unwrap_err(), CoordinationError::UserNotFound);
    }

    #[tokio::test]
    #[serial]
    async fn test_delete_missing_user_is_not_found() {
        init_test_environment().await;

        let result = delete_user(i64::MAX).await;
        assert_eq!(result.unwrap_err(), CoordinationError::UserNotFound);
    }
}
