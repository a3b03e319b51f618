use super::*;

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for an unknown email and for a wrong
    /// password alike.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let email = email.trim().to_lowercase();
        let user = self.user_repository.find_by_email(&email).await?;

        let Some(user) = user else {
            // Always hash to keep timing uniform when the user is unknown.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(user))
    }
}
