use tracing::info;

use blablabook_domain::Username;

use super::*;

impl UserService {
    /// Returns the account of a user, if it still exists.
    pub async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }

    /// Updates username and names of an account.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        params: UpdateProfileParams,
    ) -> AppResult<UserRecord> {
        let current = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        let username = match params.username {
            Some(value) => {
                let username = Username::new(value)?;
                if !username.as_str().eq_ignore_ascii_case(&current.username)
                    && self
                        .user_repository
                        .find_by_username(username.as_str())
                        .await?
                        .is_some()
                {
                    return Err(AppError::Conflict(format!(
                        "username '{}' is already taken",
                        username.as_str()
                    )));
                }
                String::from(username)
            }
            None => current.username.clone(),
        };

        let firstname = match params.firstname {
            Some(value) => normalize_person_name("firstname", Some(value))?,
            None => current.firstname.clone(),
        };
        let lastname = match params.lastname {
            Some(value) => normalize_person_name("lastname", Some(value))?,
            None => current.lastname.clone(),
        };

        let updated = self
            .user_repository
            .update_profile(
                user_id,
                ProfileChanges {
                    username,
                    firstname,
                    lastname,
                },
            )
            .await?;

        info!(user_id = %user_id, "profile updated");
        Ok(updated)
    }

    /// Deletes an account together with its role assignments.
    pub async fn delete_account(&self, user_id: UserId) -> AppResult<()> {
        self.user_repository.delete(user_id).await?;
        info!(user_id = %user_id, "account deleted");
        Ok(())
    }
}
