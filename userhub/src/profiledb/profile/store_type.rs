use crate::profiledb::errors::ProfileError;
use crate::profiledb::types::{
    CountryUserCount, Profile, ProfileFields, SortBy, SortOrder, UserProfileRecord,
};
use crate::storage::{GENERIC_DATA_STORE, StorageError};

use super::postgres::*;
use super::sqlite::*;

fn unsupported() -> ProfileError {
    ProfileError::Storage(StorageError::Database(
        "Unsupported database type".to_string(),
    ))
}

pub struct ProfileStore;

impl ProfileStore {
    /// Initialize the profile table. Runs after the user and country
    /// tables exist, the foreign keys depend on them.
    pub(crate) async fn init() -> Result<(), ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_profile_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(unsupported()),
        }
    }

    /// Create a user's profile, resolving the country name to its id
    #[tracing::instrument(skip(fields), fields(user_id = %user_id, country = %country))]
    pub async fn create_profile(
        user_id: i64,
        fields: &ProfileFields,
        country: &str,
    ) -> Result<Profile, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_profile_sqlite(pool, user_id, fields, country).await
        } else if let Some(pool) = store.as_postgres() {
            create_profile_postgres(pool, user_id, fields, country).await
        } else {
            Err(unsupported())
        }
    }

    /// Replace a user's profile fields; an absent country keeps the
    /// stored one
    #[tracing::instrument(skip(fields), fields(user_id = %user_id, country = ?country))]
    pub async fn update_profile(
        user_id: i64,
        fields: &ProfileFields,
        country: Option<&str>,
    ) -> Result<Profile, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            update_profile_sqlite(pool, user_id, fields, country).await
        } else if let Some(pool) = store.as_postgres() {
            update_profile_postgres(pool, user_id, fields, country).await
        } else {
            Err(unsupported())
        }
    }

    pub async fn get_users_profile() -> Result<Vec<UserProfileRecord>, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_users_profile_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            get_users_profile_postgres(pool).await
        } else {
            Err(unsupported())
        }
    }

    #[tracing::instrument(fields(user_id = %user_id))]
    pub async fn get_user_profile_by_id(
        user_id: i64,
    ) -> Result<Option<UserProfileRecord>, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_profile_by_id_sqlite(pool, user_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_profile_by_id_postgres(pool, user_id).await
        } else {
            Err(unsupported())
        }
    }

    pub async fn get_paginated_users_profile(
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfileRecord>, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_paginated_users_profile_sqlite(pool, limit, offset).await
        } else if let Some(pool) = store.as_postgres() {
            get_paginated_users_profile_postgres(pool, limit, offset).await
        } else {
            Err(unsupported())
        }
    }

    /// Case-insensitive substring search across username, email and
    /// profile names
    #[tracing::instrument(fields(term = %term))]
    pub async fn search_user_profiles(term: &str) -> Result<Vec<UserProfileRecord>, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            search_user_profiles_sqlite(pool, term).await
        } else if let Some(pool) = store.as_postgres() {
            search_user_profiles_postgres(pool, term).await
        } else {
            Err(unsupported())
        }
    }

    pub async fn sort_user_profiles(
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<UserProfileRecord>, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            sort_user_profiles_sqlite(pool, sort_by, sort_order).await
        } else if let Some(pool) = store.as_postgres() {
            sort_user_profiles_postgres(pool, sort_by, sort_order).await
        } else {
            Err(unsupported())
        }
    }

    pub async fn count_users_by_country() -> Result<Vec<CountryUserCount>, ProfileError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            count_users_by_country_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            count_users_by_country_postgres(pool).await
        } else {
            Err(unsupported())
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::init_test_environment;
    use crate::userdb::UserStore;

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
        UserStore::create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user")
            .id
    }

    fn sample_fields() -> ProfileFields {
        ProfileFields {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            bio: Some("Analyst".to_string()),
            profile_picture: Some("https://example.com/ada.png".to_string()),
            age: Some(36),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_create_and_fetch_profile() {
        init_test_environment().await;

        let user_id = create_test_user("prof").await;
        let profile = ProfileStore::create_profile(user_id, &sample_fields(), "France")
            .await
            .expect("Failed to create profile");

        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.age, Some(36));

        let record = ProfileStore::get_user_profile_by_id(user_id)
            .await
            .expect("Failed to fetch record")
            .expect("Record should exist");
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.country.as_deref(), Some("France"));
        assert_eq!(record.role, "user");
    }

    #[tokio::test]
    #[serial]
    async fn test_create_profile_unknown_user() {
        init_test_environment().await;

        let result = ProfileStore::create_profile(i64::MAX, &sample_fields(), "France").await;
        assert!(matches!(result, Err(ProfileError::UserNotFound)));
    }

    #[tokio::test]
    #[serial]
    async fn test_create_profile_unknown_country() {
        init_test_environment().await;

        let user_id = create_test_user("atlantis").await;
        let result = ProfileStore::create_profile(user_id, &sample_fields(), "Atlantis").await;
        assert!(matches!(result, Err(ProfileError::CountryNotFound)));
    }

    #[tokio::test]
    #[serial]
    async fn test_create_profile_twice_is_unique_violation() {
        init_test_environment().await;

        let user_id = create_test_user("dup").await;
        ProfileStore::create_profile(user_id, &sample_fields(), "France")
            .await
            .expect("Failed to create profile");

        let result = ProfileStore::create_profile(user_id, &sample_fields(), "Japan").await;
        assert!(matches!(
            result,
            Err(ProfileError::Storage(StorageError::UniqueViolation(_)))
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_update_profile_checks_run_in_order() {
        init_test_environment().await;

        let result =
            ProfileStore::update_profile(i64::MAX, &sample_fields(), Some("Atlantis")).await;
        assert!(matches!(result, Err(ProfileError::UserNotFound)));

        let user_id = create_test_user("ord").await;
        let result =
            ProfileStore::update_profile(user_id, &sample_fields(), Some("Atlantis")).await;
        assert!(matches!(result, Err(ProfileError::ProfileNotFound)));

        ProfileStore::create_profile(user_id, &sample_fields(), "France")
            .await
            .expect("Failed to create profile");
        let result =
            ProfileStore::update_profile(user_id, &sample_fields(), Some("Atlantis")).await;
        assert!(matches!(result, Err(ProfileError::CountryNotFound)));
    }

    #[tokio::test]
    #[serial]
    async fn test_update_profile_replaces_fields() {
        init_test_environment().await;

        let user_id = create_test_user("upd").await;
        ProfileStore::create_profile(user_id, &sample_fields(), "France")
            .await
            .expect("Failed to create profile");

        let new_fields = ProfileFields {
            first_name: Some("Grace".to_string()),
            last_name: None,
            bio: None,
            profile_picture: None,
            age: Some(40),
        };
        let updated = ProfileStore::update_profile(user_id, &new_fields, Some("Japan"))
            .await
            .expect("Failed to update profile");

        assert_eq!(updated.first_name.as_deref(), Some("Grace"));
        assert!(updated.last_name.is_none());
        assert_eq!(updated.age, Some(40));

        let record = ProfileStore::get_user_profile_by_id(user_id)
            .await
            .expect("Failed to fetch record")
            .expect("Record should exist");
        assert_eq!(record.country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    #[serial]
    async fn test_update_profile_without_country_keeps_existing() {
        init_test_environment().await;

        let user_id = create_test_user("keep").await;
        ProfileStore::create_profile(user_id, &sample_fields(), "France")
            .await
            .expect("Failed to create profile");

        let new_fields = ProfileFields {
            bio: Some("Updated".to_string()),
            ..sample_fields()
        };
        ProfileStore::update_profile(user_id, &new_fields, None)
            .await
            .expect("Failed to update profile");

        let record = ProfileStore::get_user_profile_by_id(user_id)
            .await
            .expect("Failed to fetch record")
            .expect("Record should exist");
        assert_eq!(record.bio.as_deref(), Some("Updated"));
        assert_eq!(record.country.as_deref(), Some("France"));
    }

    #[tokio::test]
    #[serial]
    async fn test_user_without_profile_still_listed() {
        init_test_environment().await;

        let user_id = create_test_user("bare").await;

        let record = ProfileStore::get_user_profile_by_id(user_id)
            .await
            .expect("Failed to fetch record")
            .expect("User should appear even without a profile");
        assert!(record.profile_id.is_none());
        assert!(record.country.is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_search_matches_profile_names() {
        init_test_environment().await;

        let user_id = create_test_user("search").await;
        let fields = ProfileFields {
            first_name: Some("Zyzzyva".to_string()),
            ..sample_fields()
        };
        ProfileStore::create_profile(user_id, &fields, "Brazil")
            .await
            .expect("Failed to create profile");

        let hits = ProfileStore::search_user_profiles("zyzzy")
            .await
            .expect("Search failed");
        assert!(hits.iter().any(|r| r.user_id == user_id));

        let misses = ProfileStore::search_user_profiles("nothing-matches-this")
            .await
            .expect("Search failed");
        assert!(misses.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_sort_user_profiles_orders_results() {
        init_test_environment().await;

        create_test_user("sorta").await;
        create_test_user("sortb").await;

        let records = ProfileStore::sort_user_profiles(SortBy::Username, SortOrder::Asc)
            .await
            .expect("Sort failed");
        let usernames: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
        let mut sorted = usernames.clone();
        sorted.sort();
        assert_eq!(usernames, sorted);
    }

    #[tokio::test]
    #[serial]
    async fn test_pagination_respects_limit_and_offset() {
        init_test_environment().await;

        create_test_user("pagea").await;
        create_test_user("pageb").await;
        create_test_user("pagec").await;

        let first = ProfileStore::get_paginated_users_profile(2, 0)
            .await
            .expect("Pagination failed");
        assert!(first.len() <= 2);

        let far = ProfileStore::get_paginated_users_profile(10, 1_000_000)
            .await
            .expect("Pagination failed");
        assert!(far.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_count_users_by_country_groups() {
        init_test_environment().await;

        let user_id = create_test_user("geo").await;
        ProfileStore::create_profile(user_id, &sample_fields(), "Canada")
            .await
            .expect("Failed to create profile");

        let counts = ProfileStore::count_users_by_country()
            .await
            .expect("Count failed");
        let canada = counts
            .iter()
            .find(|c| c.country.as_deref() == Some("Canada"))
            .expect("Canada bucket should exist");
        assert!(canada.user_count >= 1);
    }
}
