//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod access_rows;
mod argon2_password_hasher;
mod in_memory_authorization_audit_repository;
mod in_memory_identity_store;
mod postgres_access_admin_repository;
mod postgres_authorization_audit_repository;
mod postgres_authorization_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_authorization_audit_repository::InMemoryAuthorizationAuditRepository;
pub use in_memory_identity_store::InMemoryIdentityStore;
pub use postgres_access_admin_repository::PostgresAccessAdminRepository;
pub use postgres_authorization_audit_repository::PostgresAuthorizationAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_user_repository::PostgresUserRepository;
