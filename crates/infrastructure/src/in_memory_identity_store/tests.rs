use std::sync::Arc;

use blablabook_application::{
    AccessAdminRepository, AuthorizationRepository, AuthorizationService, CreatePermissionInput,
    NewUser, ProfileChanges, SaveRoleInput, UserRepository,
};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{BuiltinPermission, RoleName};

use super::InMemoryIdentityStore;

fn new_user(email: &str, username: &str) -> NewUser {
    NewUser {
        email: email.to_owned(),
        username: username.to_owned(),
        password_hash: "hash".to_owned(),
        firstname: None,
        lastname: None,
    }
}

#[tokio::test]
async fn email_and_username_are_unique_case_insensitively() -> AppResult<()> {
    let store = InMemoryIdentityStore::new();
    store
        .create(new_user("reader@blablabook.local", "reader"))
        .await?;

    assert!(matches!(
        store
            .create(new_user("Reader@BlaBlaBook.local", "other"))
            .await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        store
            .create(new_user("other@blablabook.local", "READER"))
            .await,
        Err(AppError::Conflict(_))
    ));
    Ok(())
}

#[tokio::test]
async fn profile_update_keeps_own_username() -> AppResult<()> {
    let store = InMemoryIdentityStore::new();
    let reader = store
        .create(new_user("reader@blablabook.local", "reader"))
        .await?;

    let updated = store
        .update_profile(
            reader.id,
            ProfileChanges {
                username: "Reader".to_owned(),
                firstname: Some("Ada".to_owned()),
                lastname: None,
            },
        )
        .await?;
    assert_eq!(updated.username, "Reader");
    assert_eq!(updated.firstname.as_deref(), Some("Ada"));
    Ok(())
}

#[tokio::test]
async fn cascades_follow_role_and_user_deletion() -> AppResult<()> {
    let store = InMemoryIdentityStore::new();
    let reader = store
        .create(new_user("reader@blablabook.local", "reader"))
        .await?;
    let role = store
        .create_role(SaveRoleInput {
            name: RoleName::new("user")?,
            description: None,
        })
        .await?;
    let read = store
        .create_permission(CreatePermissionInput {
            label: BuiltinPermission::Read.label(),
            action: BuiltinPermission::Read.action().to_owned(),
        })
        .await?;

    store
        .grant_permission_to_role(role.role_id, read.permission_id)
        .await?;
    store.assign_role_to_user(reader.id, role.role_id).await?;
    assert_eq!(store.list_roles_for_user(reader.id).await?.len(), 1);

    store.delete_permission(read.permission_id).await?;
    assert!(store.list_role_permissions(role.role_id).await?.is_empty());

    store.delete(reader.id).await?;
    assert!(!store.user_exists(reader.id).await?);
    assert!(store.list_user_role_assignments(reader.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn assignment_requires_existing_rows() -> AppResult<()> {
    let store = InMemoryIdentityStore::new();
    let role = store
        .create_role(SaveRoleInput {
            name: RoleName::new("admin")?,
            description: None,
        })
        .await?;

    assert!(matches!(
        store.assign_role_to_user(UserId::new(77), role.role_id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn unavailable_store_fails_resolution_instead_of_denying() -> AppResult<()> {
    let store = Arc::new(InMemoryIdentityStore::new());
    let reader = store
        .create(new_user("reader@blablabook.local", "reader"))
        .await?;
    let authorization = AuthorizationService::new(store.clone());

    store.set_unavailable(true);
    let resolved = authorization.resolve_permissions(reader.id).await;
    assert!(matches!(resolved, Err(AppError::Unavailable(_))));

    store.set_unavailable(false);
    assert!(authorization.resolve_permissions(reader.id).await?.is_empty());
    Ok(())
}
