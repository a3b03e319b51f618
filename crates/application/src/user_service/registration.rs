use tracing::{info, warn};

use blablabook_domain::{EmailAddress, Username, validate_password};

use super::*;

impl UserService {
    /// Registers a new account and assigns the default role when it exists.
    pub async fn register(&self, params: RegisterParams) -> AppResult<UserRecord> {
        let email = EmailAddress::new(params.email)?;
        let username = Username::new(params.username)?;
        validate_password(&params.password)?;
        let firstname = normalize_person_name("firstname", params.firstname)?;
        let lastname = normalize_person_name("lastname", params.lastname)?;

        if self
            .user_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            // Still hash to keep response timing uniform.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        if self
            .user_repository
            .find_by_username(username.as_str())
            .await?
            .is_some()
        {
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let user = self
            .user_repository
            .create(NewUser {
                email: email.into(),
                username: username.into(),
                password_hash,
                firstname,
                lastname,
            })
            .await?;

        self.assign_default_role(&user).await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    async fn assign_default_role(&self, user: &UserRecord) -> AppResult<()> {
        let Some(role_name) = &self.default_role else {
            return Ok(());
        };

        let Some(role) = self.access_repository.find_role_by_name(role_name).await? else {
            warn!(role = %role_name, "default role is missing, new user has no roles");
            return Ok(());
        };

        self.access_repository
            .assign_role_to_user(user.id, role.role_id)
            .await
    }
}
