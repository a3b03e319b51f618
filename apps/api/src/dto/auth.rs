use std::collections::BTreeSet;

use blablabook_application::{RegisterParams, UpdateProfileParams, UserRecord};
use blablabook_domain::PermissionLabel;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for account registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl From<RegisterRequest> for RegisterParams {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            username: value.username,
            password: value.password,
            firstname: value.firstname,
            lastname: value.lastname,
        }
    }
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Incoming payload for profile updates. Omitted fields are kept.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileParams {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            username: value.username,
            firstname: value.firstname,
            lastname: value.lastname,
        }
    }
}

/// Public account profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-profile-response.ts"
)]
pub struct UserProfileResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub email: String,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub created_at: String,
}

impl From<UserRecord> for UserProfileResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.as_i64(),
            email: value.email,
            username: value.username,
            firstname: value.firstname,
            lastname: value.lastname,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Signed-in user with the permissions currently resolved for them.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/current-user-response.ts"
)]
pub struct CurrentUserResponse {
    pub user: UserProfileResponse,
    pub permissions: Vec<String>,
}

impl CurrentUserResponse {
    pub fn new(user: UserRecord, permissions: BTreeSet<PermissionLabel>) -> Self {
        Self {
            user: user.into(),
            permissions: permissions
                .into_iter()
                .map(|label| label.as_str().to_owned())
                .collect(),
        }
    }
}
