use crate::coordination::errors::CoordinationError;
use crate::profiledb::{
    CountryUserCount, Profile, ProfileFields, ProfileStore, SortBy, SortOrder, UserProfileRecord,
};
use crate::userdb::UserStore;

/// One page of profile records plus the figures the envelope needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedUserProfiles {
    pub records: Vec<UserProfileRecord>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_users: i64,
}

pub async fn create_profile(
    user_id: i64,
    fields: &ProfileFields,
    country: &str,
) -> Result<Profile, CoordinationError> {
    let profile = ProfileStore::create_profile(user_id, fields, country).await?;
    tracing::info!(user_id, profile_id = profile.id, "Profile created");
    Ok(profile)
}

pub async fn update_profile(
    user_id: i64,
    fields: &ProfileFields,
    country: Option<&str>,
) -> Result<Profile, CoordinationError> {
    let profile = ProfileStore::update_profile(user_id, fields, country).await?;
    tracing::info!(user_id, profile_id = profile.id, "Profile updated");
    Ok(profile)
}

/// All users joined with their profiles; an empty listing is a valid
/// result here.
pub async fn get_users_profile() -> Result<Vec<UserProfileRecord>, CoordinationError> {
    Ok(ProfileStore::get_users_profile().await?)
}

pub async fn get_user_profile_by_id(user_id: i64) -> Result<UserProfileRecord, CoordinationError> {
    ProfileStore::get_user_profile_by_id(user_id)
        .await?
        .ok_or_else(|| CoordinationError::UserNotFound.log())
}

/// A page of profile records; `page` is 1-based and an out-of-range
/// page yields an empty record set with the true totals.
pub async fn get_paginated_users_profile(
    page: i64,
    limit: i64,
) -> Result<PaginatedUserProfiles, CoordinationError> {
    let offset = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .filter(|offset| *offset >= 0);
    let records = match offset {
        Some(offset) => ProfileStore::get_paginated_users_profile(limit, offset).await?,
        // An offset that does not fit i64 cannot address any rows
        None => Vec::new(),
    };
    let total_users = UserStore::count_users().await?;
    let total_pages = (total_users + limit - 1) / limit;

    Ok(PaginatedUserProfiles {
        records,
        current_page: page,
        total_pages,
        total_users,
    })
}

pub async fn search_user_profiles(term: &str) -> Result<Vec<UserProfileRecord>, CoordinationError> {
    let records = ProfileStore::search_user_profiles(term).await?;
    if records.is_empty() {
        return Err(CoordinationError::EmptyResult("No user profiles found".to_string()).log());
    }
    Ok(records)
}

pub async fn sort_user_profiles(
    sort_by: SortBy,
    sort_order: SortOrder,
) -> Result<Vec<UserProfileRecord>, CoordinationError> {
    let records = ProfileStore::sort_user_profiles(sort_by, sort_order).await?;
    if records.is_empty() {
        return Err(CoordinationError::EmptyResult("No user profiles found".to_string()).log());
    }
    Ok(records)
}

pub async fn count_users_by_country() -> Result<Vec<CountryUserCount>, CoordinationError> {
    Ok(ProfileStore::count_users_by_country().await?)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::coordination::user::create_user;
    use crate::test_utils::init_test_environment;

    fn unique(prefix: &str) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Clock before epoch")
            .as_nanos();
        format!("{prefix}{nanos}")
    }

    async fn create_test_user(prefix: &str) -> i64 {
        let username = unique(prefix);
        let email = format!("{username}@example.com");
        create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user")
            .id
    }

    fn sample_fields() -> ProfileFields {
        ProfileFields {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            bio: None,
            profile_picture: None,
            age: Some(36),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_duplicate_profile_classifies_as_profile_exists() {
        init_test_environment().await;

        let user_id = create_test_user("svcprof").await;
        create_profile(user_id, &sample_fields(), "France")
            .await
            .expect("Failed to create profile");

        let result = create_profile(user_id, &sample_fields(), "France").await;
        assert_eq!(result.unwrap_err(), CoordinationError::ProfileExists);
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_country_classifies() {
        init_test_environment().await;

        let user_id = create_test_user("svcgeo").await;
        let result = create_profile(user_id, &sample_fields(), "Atlantis").await;
        assert_eq!(result.unwrap_err(), CoordinationError::CountryNotFound);
    }

    #[tokio::test]
    #[serial]
    async fn test_search_without_matches_is_empty_result() {
        init_test_environment().await;

        create_test_user("svcsearch").await;
        let result = search_user_profiles("term-that-matches-nothing-at-all").await;
        assert_eq!(
            result.unwrap_err(),
            CoordinationError::EmptyResult("No user profiles found".to_string())
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_pagination_totals() {
        init_test_environment().await;

        create_test_user("svcpagea").await;
        create_test_user("svcpageb").await;

        let page = get_paginated_users_profile(1, 10)
            .await
            .expect("Pagination failed");
        assert_eq!(page.current_page, 1);
        assert!(page.total_users >= 2);
        assert_eq!(page.total_pages, (page.total_users + 9) / 10);

        let far = get_paginated_users_profile(1_000_000, 10)
            .await
            .expect("Pagination failed");
        assert!(far.records.is_empty());
        assert_eq!(far.total_users, page.total_users);
    }

    #[tokio::test]
    #[serial]
    async fn test_pagination_offset_overflow_is_empty_page() {
        init_test_environment().await;

        create_test_user("svcbig").await;

        let page = get_paginated_users_profile(i64::MAX, 100)
            .await
            .expect("Pagination failed");
        assert!(page.records.is_empty());
        assert!(page.total_users >= 1);
        assert_eq!(page.current_page, i64::MAX);
    }

    #[tokio::test]
    #[serial]
    async fn test_count_by_country_allows_empty() {
        init_test_environment().await;

        // No assertion on contents, the tally is valid even when no
        // profiles exist yet.
        count_users_by_country().await.expect("Count failed");
    }
}
