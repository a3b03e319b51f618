use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode, header, request};
use ipnet::IpNet;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::cookie::Key;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, Error as SessionStoreError};
use tower_sessions::{MemoryStore, SessionManagerLayer, SessionStore};

use blablabook_application::{
    AccessAdminRepository, AccessAdminService, AuthorizationAuditRecord,
    AuthorizationAuditService, AuthorizationService, UserRepository, UserService,
};
use blablabook_core::UserId;
use blablabook_domain::{AuthorizationOutcome, BuiltinPermission, RoleId, RoleName};
use blablabook_infrastructure::{
    Argon2PasswordHasher, InMemoryAuthorizationAuditRepository, InMemoryIdentityStore,
};

use crate::seed::seed;
use crate::state::AppState;

use super::build_router;

const FRONTEND_URL: &str = "http://localhost:5173";
const CLIENT_IP: &str = "203.0.113.5";
const PROXY_PEER: [u8; 4] = [10, 0, 0, 2];
const TRUSTED_PROXY_RANGE: &str = "10.0.0.0/8";
const CLIENT_AGENT: &str = "blablabook-tests";
const PASSWORD: &str = "correct-horse-battery";

struct TestApp {
    router: Router,
    store: Arc<InMemoryIdentityStore>,
    audit: Arc<InMemoryAuthorizationAuditRepository>,
    sessions: FlakySessionStore,
}

/// Memory-backed session store whose loads can be made to fail.
#[derive(Debug, Clone, Default)]
struct FlakySessionStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FlakySessionStore {
    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for FlakySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.inner.create(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.inner.save(record).await
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SessionStoreError::Backend("session store offline".to_owned()));
        }
        self.inner.load(session_id).await
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.inner.delete(session_id).await
    }
}

struct TestResponse {
    status: StatusCode,
    session_cookie: Option<String>,
    body: Value,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(InMemoryIdentityStore::new());
        let audit = Arc::new(InMemoryAuthorizationAuditRepository::new());
        let hasher = Argon2PasswordHasher::with_cost(1024, 1, 1)
            .unwrap_or_else(|error| panic!("hasher: {error}"));

        let authorization_service = AuthorizationService::new(store.clone());
        let user_service = UserService::new(
            store.clone(),
            Arc::new(hasher),
            store.clone(),
            RoleName::new("user").ok(),
        );
        seed(store.as_ref(), store.as_ref(), &user_service, None)
            .await
            .unwrap_or_else(|error| panic!("seed: {error}"));

        let state = AppState {
            user_service,
            authorization_service: authorization_service.clone(),
            authorization_audit_service: AuthorizationAuditService::new(audit.clone()),
            access_admin_service: AccessAdminService::new(
                store.clone(),
                store.clone(),
                authorization_service,
            ),
            frontend_url: FRONTEND_URL.to_owned(),
            trusted_proxies: vec![
                TRUSTED_PROXY_RANGE
                    .parse::<IpNet>()
                    .unwrap_or_else(|error| panic!("proxy range: {error}")),
            ]
            .into(),
            postgres_pool: None,
            redis_client: None,
            redis_required: false,
        };

        let key = Key::try_from(&[7_u8; 64][..]).unwrap_or_else(|error| panic!("key: {error}"));
        let sessions = FlakySessionStore::default();
        let session_layer = SessionManagerLayer::new(sessions.clone()).with_signed(key);
        let router = build_router(state, FRONTEND_URL, session_layer)
            .unwrap_or_else(|error| panic!("router: {error}"));

        Self {
            router,
            store,
            audit,
            sessions,
        }
    }

    /// Request arriving through the trusted proxy on behalf of `CLIENT_IP`.
    fn builder(method: Method, uri: &str) -> request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, FRONTEND_URL)
            .header("x-forwarded-for", CLIENT_IP)
            .header(header::USER_AGENT, CLIENT_AGENT)
            .extension(ConnectInfo(SocketAddr::from((PROXY_PEER, 40_000))))
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Self::builder(method, uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap_or_else(|error| panic!("request: {error}"));

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|error| match error {});

        let status = response.status();
        let session_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|error| panic!("body: {error}"));
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|error| panic!("json: {error}"))
        };

        TestResponse {
            status,
            session_cookie,
            body,
        }
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, cookie, None).await
    }

    async fn register(&self, email: &str, username: &str) -> UserId {
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let Some(id) = response.body["id"].as_i64() else {
            panic!("registration returned no id: {}", response.body);
        };
        UserId::new(id)
    }

    async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        let Some(cookie) = response.session_cookie else {
            panic!("login did not set a session cookie");
        };
        cookie
    }

    async fn role_id(&self, name: &str) -> RoleId {
        let name = RoleName::new(name).unwrap_or_else(|error| panic!("role name: {error}"));
        match self.store.find_role_by_name(&name).await {
            Ok(Some(role)) => role.role_id,
            other => panic!("role '{name}' missing: {other:?}"),
        }
    }

    async fn reader(&self) -> (UserId, String) {
        let user_id = self.register("reader@blablabook.local", "reader").await;
        (user_id, self.login("reader@blablabook.local").await)
    }

    async fn admin(&self) -> (UserId, String) {
        let user_id = self.register("admin@blablabook.local", "librarian").await;
        let admin_role = self.role_id("admin").await;
        self.store
            .assign_role_to_user(user_id, admin_role)
            .await
            .unwrap_or_else(|error| panic!("assign admin: {error}"));
        (user_id, self.login("admin@blablabook.local").await)
    }

    /// Waits for the detached audit writes to land.
    async fn audit_records(&self, expected: usize) -> Vec<AuthorizationAuditRecord> {
        for _ in 0..200 {
            if self.audit.records().await.len() >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        self.audit.records().await
    }
}

#[tokio::test]
async fn anonymous_request_is_rejected_and_audited() {
    let app = TestApp::new().await;

    let response = app.get("/api/roles", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["code"], "NOT_AUTHENTICATED");

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuthorizationOutcome::Unauthenticated);
    assert_eq!(records[0].user_id, None);
    assert_eq!(records[0].permission, BuiltinPermission::AdminRoles.label());
    assert_eq!(records[0].resource.as_deref(), Some("role"));
}

#[tokio::test]
async fn missing_permission_is_403_naming_it() {
    let app = TestApp::new().await;
    let (reader_id, cookie) = app.reader().await;

    let response = app.get("/api/roles/1", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["code"], "PERMISSION_DENIED");
    assert_eq!(response.body["required_permission"], "ADMIN_ROLES");
    assert_eq!(response.body["resource"], "role");
    assert_eq!(response.body["resource_id"], "1");

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuthorizationOutcome::Denied);
    assert_eq!(records[0].user_id, Some(reader_id));
    assert_eq!(
        records[0].user_email.as_deref(),
        Some("reader@blablabook.local")
    );
}

#[tokio::test]
async fn granted_request_reaches_handler_and_is_audited_once() {
    let app = TestApp::new().await;
    let (admin_id, cookie) = app.admin().await;

    let response = app.get("/api/roles", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let names = response
        .body
        .as_array()
        .map(|roles| {
            roles
                .iter()
                .filter_map(|role| role["name"].as_str())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    assert_eq!(names, vec!["admin", "user"]);

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuthorizationOutcome::Granted);
    assert_eq!(records[0].user_id, Some(admin_id));
    assert_eq!(records[0].ip_address.as_deref(), Some(CLIENT_IP));
    assert_eq!(records[0].user_agent.as_deref(), Some(CLIENT_AGENT));
}

#[tokio::test]
async fn resource_id_comes_from_the_id_parameter() {
    let app = TestApp::new().await;
    let (reader_id, _) = app.reader().await;
    let (_, cookie) = app.admin().await;
    let admin_role = app.role_id("admin").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/users/{reader_id}/roles/{admin_role}"),
            Some(&cookie),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resource.as_deref(), Some("user"));
    assert_eq!(
        records[0].resource_id.as_deref(),
        Some(reader_id.to_string().as_str())
    );
}

#[tokio::test]
async fn role_changes_apply_to_the_next_request() {
    let app = TestApp::new().await;
    let (reader_id, reader_cookie) = app.reader().await;
    let (_, admin_cookie) = app.admin().await;
    let admin_role = app.role_id("admin").await;
    let assignment = format!("/api/users/{reader_id}/roles/{admin_role}");

    let before = app.get("/api/roles", Some(&reader_cookie)).await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    let assigned = app
        .request(Method::PUT, &assignment, Some(&admin_cookie), None)
        .await;
    assert_eq!(assigned.status, StatusCode::NO_CONTENT);
    let granted = app.get("/api/roles", Some(&reader_cookie)).await;
    assert_eq!(granted.status, StatusCode::OK);

    let removed = app
        .request(Method::DELETE, &assignment, Some(&admin_cookie), None)
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);
    let revoked = app.get("/api/roles", Some(&reader_cookie)).await;
    assert_eq!(revoked.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn failing_audit_store_does_not_change_the_outcome() {
    let app = TestApp::new().await;
    let (_, cookie) = app.admin().await;
    app.audit.set_failing(true);

    let granted = app.get("/api/roles", Some(&cookie)).await;
    assert_eq!(granted.status, StatusCode::OK);

    let anonymous = app.get("/api/roles", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    assert!(app.audit_records(0).await.is_empty());
}

#[tokio::test]
async fn store_outage_is_503_and_audited_as_resolution_failure() {
    let app = TestApp::new().await;
    let (_, cookie) = app.admin().await;
    app.store.set_unavailable(true);

    let response = app.get("/api/roles", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["code"], "SERVICE_UNAVAILABLE");

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuthorizationOutcome::ResolutionFailed);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new().await;
    app.register("reader@blablabook.local", "reader").await;

    let same_email = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "Reader@BlaBlaBook.local",
                "username": "another",
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
    assert_eq!(same_email.body["code"], "CONFLICT");

    let same_username = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "other@blablabook.local",
                "username": "reader",
                "password": PASSWORD,
            })),
        )
        .await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_login_sets_no_identity() {
    let app = TestApp::new().await;
    app.register("reader@blablabook.local", "reader").await;

    for (email, password) in [
        ("reader@blablabook.local", "wrong-password-123"),
        ("nobody@blablabook.local", PASSWORD),
    ] {
        let response = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["code"], "NOT_AUTHENTICATED");
        assert_eq!(response.session_cookie, None);
    }
}

#[tokio::test]
async fn me_reports_profile_and_effective_permissions() {
    let app = TestApp::new().await;
    let (_, cookie) = app.reader().await;

    let response = app.get("/api/auth/me", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], "reader");
    assert_eq!(
        response.body["permissions"],
        json!(["CREATE", "DELETE", "READ", "UPDATE"])
    );

    let anonymous = app.get("/api/auth/me", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["code"], "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn session_of_a_deleted_user_is_invalidated() {
    let app = TestApp::new().await;
    let (reader_id, cookie) = app.reader().await;
    app.store
        .delete(reader_id)
        .await
        .unwrap_or_else(|error| panic!("delete: {error}"));

    let stale = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.body["code"], "INVALID_SESSION");

    let flushed = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(flushed.body["code"], "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn profile_update_refreshes_the_session_identity() {
    let app = TestApp::new().await;
    let (_, cookie) = app.reader().await;

    let updated = app
        .request(
            Method::PUT,
            "/api/profile",
            Some(&cookie),
            Some(json!({ "username": "bookworm", "firstname": "Ada" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["username"], "bookworm");

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.body["user"]["username"], "bookworm");
    assert_eq!(me.body["user"]["firstname"], "Ada");
}

#[tokio::test]
async fn deleting_the_profile_ends_the_session() {
    let app = TestApp::new().await;
    let (_, cookie) = app.reader().await;

    let deleted = app
        .request(Method::DELETE, "/api/profile", Some(&cookie), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let relogin = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "reader@blablabook.local", "password": PASSWORD })),
        )
        .await;
    assert_eq!(relogin.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = TestApp::new().await;
    let (_, cookie) = app.reader().await;

    let logout = app
        .request(Method::POST, "/api/auth/logout", Some(&cookie), None)
        .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cross_site_mutations_are_blocked() {
    let app = TestApp::new().await;

    let foreign_origin = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request: {error}"));
    assert_eq!(app.send(foreign_origin).await.status, StatusCode::FORBIDDEN);

    let fetch_metadata = TestApp::builder(Method::POST, "/api/auth/logout")
        .header("sec-fetch-site", "cross-site")
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request: {error}"));
    assert_eq!(app.send(fetch_metadata).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lookalike_origins_are_not_the_frontend() {
    let app = TestApp::new().await;

    for lookalike in [
        "http://localhost:5173.evil.example",
        "http://localhost:51730",
        "https://localhost:5173",
    ] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/logout")
            .header(header::ORIGIN, lookalike)
            .header(header::REFERER, format!("{lookalike}/attack"))
            .body(Body::empty())
            .unwrap_or_else(|error| panic!("request: {error}"));

        let response = app.send(request).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{lookalike}");
        assert_eq!(response.body["code"], "FORBIDDEN");
    }

    let referer_only = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::REFERER, "http://localhost:5173.evil.example/attack")
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request: {error}"));
    assert_eq!(app.send(referer_only).await.status, StatusCode::FORBIDDEN);

    let missing_both = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request: {error}"));
    assert_eq!(app.send(missing_both).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn frontend_referer_admits_mutations_without_origin() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::REFERER, format!("{FRONTEND_URL}/account/settings"))
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request: {error}"));

    assert_eq!(app.send(request).await.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn untrusted_peer_cannot_choose_its_audited_address() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/roles")
        .header("x-forwarded-for", "192.0.2.200")
        .extension(ConnectInfo(SocketAddr::from(([198, 51, 100, 9], 50_000))))
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request: {error}"));
    assert_eq!(app.send(request).await.status, StatusCode::UNAUTHORIZED);

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip_address.as_deref(), Some("198.51.100.9"));
}

#[tokio::test]
async fn session_store_failure_is_audited_before_the_500() {
    let app = TestApp::new().await;
    let (_, cookie) = app.admin().await;
    app.sessions.set_failing(true);

    let response = app.get("/api/roles", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], "INTERNAL_ERROR");

    let records = app.audit_records(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuthorizationOutcome::ResolutionFailed);
    assert_eq!(records[0].user_id, None);
    assert_eq!(records[0].ip_address.as_deref(), Some(CLIENT_IP));
}

#[tokio::test]
async fn audit_listing_is_reserved_to_audit_holders() {
    let app = TestApp::new().await;
    let (reader_id, reader_cookie) = app.reader().await;
    let (_, admin_cookie) = app.admin().await;

    let denied = app
        .get("/api/audit/authorizations", Some(&reader_cookie))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.body["required_permission"], "ADMIN_AUDIT");
    app.audit_records(1).await;

    let listed = app
        .get("/api/audit/authorizations?limit=10", Some(&admin_cookie))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let Some(entries) = listed.body.as_array() else {
        panic!("expected an array: {}", listed.body);
    };
    assert!(entries.iter().any(|entry| {
        entry["outcome"] == "denied"
            && entry["granted"] == false
            && entry["user_id"] == reader_id.as_i64()
    }));

    let invalid = app
        .get("/api/audit/authorizations?limit=0", Some(&admin_cookie))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn role_administration_round_trip() {
    let app = TestApp::new().await;
    let (_, cookie) = app.admin().await;

    let created = app
        .request(
            Method::POST,
            "/api/roles",
            Some(&cookie),
            Some(json!({ "name": "Moderator", "description": "Reviews reports" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["name"], "moderator");
    let Some(role_id) = created.body["id"].as_i64() else {
        panic!("role id missing: {}", created.body);
    };

    let duplicate = app
        .request(
            Method::POST,
            "/api/roles",
            Some(&cookie),
            Some(json!({ "name": "moderator" })),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let permission = app
        .request(
            Method::POST,
            "/api/permissions",
            Some(&cookie),
            Some(json!({ "label": "moderate_reviews", "action": "Hide abusive reviews" })),
        )
        .await;
    assert_eq!(permission.status, StatusCode::CREATED);
    assert_eq!(permission.body["label"], "MODERATE_REVIEWS");
    let Some(permission_id) = permission.body["id"].as_i64() else {
        panic!("permission id missing: {}", permission.body);
    };

    let grant = app
        .request(
            Method::PUT,
            &format!("/api/roles/{role_id}/permissions/{permission_id}"),
            Some(&cookie),
            None,
        )
        .await;
    assert_eq!(grant.status, StatusCode::NO_CONTENT);

    let grants = app
        .get(&format!("/api/roles/{role_id}/permissions"), Some(&cookie))
        .await;
    assert_eq!(grants.body[0]["label"], "MODERATE_REVIEWS");

    let deleted = app
        .request(
            Method::DELETE,
            &format!("/api/roles/{role_id}"),
            Some(&cookie),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = app
        .get(&format!("/api/roles/{role_id}"), Some(&cookie))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_disabled_dependencies_as_ready() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ready"], true);
    assert_eq!(response.body["postgres"]["status"], "disabled");
}
