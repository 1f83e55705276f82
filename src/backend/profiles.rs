use tracing::error;

use super::models::{NewProfile, Profile, ProfileChanges};
use super::{decode_rows, Backend, BackendError, Query, PROFILES};

/// Repository for `profiles` operations. Failures are logged and reported
/// as an absent result.
pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn list(backend: &dyn Backend, access_token: &str) -> Vec<Profile> {
        match Self::fetch(backend, &Query::new(), access_token).await {
            Ok(profiles) => profiles,
            Err(e) => {
                error!("Error fetching profiles: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get(backend: &dyn Backend, access_token: &str, user_id: &str) -> Option<Profile> {
        match Self::fetch(backend, &Query::new().eq("id", user_id), access_token).await {
            Ok(profiles) => profiles.into_iter().next(),
            Err(e) => {
                error!("Error fetching user data: {}", e);
                None
            }
        }
    }

    pub async fn create(
        backend: &dyn Backend,
        access_token: &str,
        profile: &NewProfile,
    ) -> Option<Profile> {
        let result = async {
            let payload = serde_json::to_value([profile])?;
            let rows = backend.insert(PROFILES, payload, Some(access_token)).await?;
            decode_rows::<Profile>(rows)
        }
        .await;

        match result {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                error!("Error creating profile: {}", e);
                None
            }
        }
    }

    pub async fn update(
        backend: &dyn Backend,
        access_token: &str,
        id: &str,
        changes: &ProfileChanges,
    ) -> Option<Profile> {
        let result = async {
            let rows = backend
                .update(
                    PROFILES,
                    &Query::new().eq("id", id),
                    serde_json::to_value(changes)?,
                    Some(access_token),
                )
                .await?;
            decode_rows::<Profile>(rows)
        }
        .await;

        match result {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                error!("Error updating profile: {}", e);
                None
            }
        }
    }

    async fn fetch(
        backend: &dyn Backend,
        query: &Query,
        access_token: &str,
    ) -> Result<Vec<Profile>, BackendError> {
        let rows = backend.select(PROFILES, query, Some(access_token)).await?;
        decode_rows(rows)
    }
}
