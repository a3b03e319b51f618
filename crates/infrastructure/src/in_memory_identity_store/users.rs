use super::*;

impl InMemoryIdentityStore {
    pub(super) async fn find_user_by(
        &self,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|user| predicate(user))
            .cloned())
    }

    pub(super) async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.write().await;
        ensure_unique_identity(&state, None, Some(&user.email), &user.username)?;

        state.next_user_id += 1;
        let record = UserRecord {
            id: UserId::new(state.next_user_id),
            email: user.email.to_lowercase(),
            username: user.username,
            password_hash: user.password_hash,
            firstname: user.firstname,
            lastname: user.lastname,
            created_at: Utc::now(),
        };

        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    pub(super) async fn update_user_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<UserRecord> {
        let mut state = self.state.write().await;
        ensure_unique_identity(&state, Some(user_id), None, &changes.username)?;

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        user.username = changes.username;
        user.firstname = changes.firstname;
        user.lastname = changes.lastname;
        Ok(user.clone())
    }

    pub(super) async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.users.remove(&user_id).is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        state.assignments.retain(|(user, _), _| *user != user_id);
        Ok(())
    }
}

fn ensure_unique_identity(
    state: &IdentityState,
    current: Option<UserId>,
    email: Option<&str>,
    username: &str,
) -> AppResult<()> {
    for user in state.users.values() {
        if Some(user.id) == current {
            continue;
        }

        if email.is_some_and(|email| user.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        if user.username.eq_ignore_ascii_case(username) {
            return Err(AppError::Conflict(
                "this username is already taken".to_owned(),
            ));
        }
    }

    Ok(())
}
