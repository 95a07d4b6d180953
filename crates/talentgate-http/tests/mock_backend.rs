//! Mock backend tests for the HTTP collaborators.
//!
//! These tests use wiremock to simulate the recruitment backend and exercise
//! sign-in, refresh, sign-out and the full executor path without network
//! access or real credentials.

use std::sync::Arc;

use serde_json::json;
use talentgate_core::{
    AccessToken, ApiUrl, AuthError, AuthenticatedRequestExecutor, AuthenticationStatus, Clock,
    Credentials, Error, RefreshToken, RequestDescriptor, Session, SessionProvider, SystemClock,
    UserRole,
};
use talentgate_http::{HttpTransport, REFRESH_ERROR, RestSessionManager};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWT_EXP_1900000000: &str =
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJleHAiOjE5MDAwMDAwMDAsInN1YiI6InUtNDIifQ.sig";

/// Helper to create an API URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn now() -> i64 {
    SystemClock.now_epoch_seconds()
}

async fn mount_login(server: &MockServer, access: &str, refresh: &str, exp: i64) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "refreshToken": refresh,
            "exp": exp,
            "user": {"id": "u-42", "email": "rev@example.org", "role": "reviewer"}
        })))
        .mount(server)
        .await;
}

fn executor(
    manager: &Arc<RestSessionManager>,
    server: &MockServer,
) -> AuthenticatedRequestExecutor<RestSessionManager, HttpTransport> {
    AuthenticatedRequestExecutor::new(
        manager.clone(),
        Arc::new(HttpTransport::new(mock_api_url(server))),
    )
}

// ============================================================================
// Sign-in Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "rev@example.org",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "test-access-token",
            "refreshToken": "test-refresh-token",
            "exp": 1_900_000_000,
            "user": {"id": 42, "email": "rev@example.org", "role": "reviewer"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = RestSessionManager::new(mock_api_url(&server));
    let session = manager
        .login(Credentials::new("rev@example.org", "secret123"))
        .await
        .unwrap();

    assert_eq!(session.status, AuthenticationStatus::Authenticated);
    assert_eq!(session.exp, 1_900_000_000);
    assert_eq!(
        session.access_token,
        Some(AccessToken::new("test-access-token"))
    );
    let user = session.user.unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.role, UserRole::Reviewer);
    assert!(manager.current().is_authenticated());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "InvalidCredentials",
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let manager = RestSessionManager::new(mock_api_url(&server));
    let result = manager
        .login(Credentials::new("rev@example.org", "wrong"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::InvalidCredentials))
    ));
    assert!(!manager.current().is_authenticated());
}

#[tokio::test]
async fn test_login_server_error_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "detail": "maintenance"
        })))
        .mount(&server)
        .await;

    let manager = RestSessionManager::new(mock_api_url(&server));
    let err = manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("503"));
    assert!(message.contains("maintenance"));
}

#[tokio::test]
async fn test_login_reads_expiry_from_jwt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": JWT_EXP_1900000000,
            "refreshToken": "r"
        })))
        .mount(&server)
        .await;

    let manager = RestSessionManager::new(mock_api_url(&server));
    let session = manager
        .login(Credentials::new("a@example.org", "p"))
        .await
        .unwrap();

    assert_eq!(session.exp, 1_900_000_000);
    assert!(session.user.is_none());
}

// ============================================================================
// Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let server = MockServer::start().await;
    mount_login(&server, "old-access", "old-refresh", now() + 3600).await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": "old-refresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-access",
            "refreshToken": "new-refresh",
            "expiresIn": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = RestSessionManager::new(mock_api_url(&server));
    manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap();

    let session = manager.refresh().await.unwrap();

    assert!(session.has_usable_access_token());
    assert_eq!(session.access_token, Some(AccessToken::new("new-access")));
    assert_eq!(session.refresh_token, Some(RefreshToken::new("new-refresh")));
    assert!(session.exp >= now() + 890);
    // The user from sign-in survives a refresh that does not repeat it.
    assert_eq!(session.user.unwrap().role, UserRole::Reviewer);
}

#[tokio::test]
async fn test_refresh_keeps_unrotated_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "new-access",
            "exp": 1_900_000_000
        })))
        .mount(&server)
        .await;

    let manager = RestSessionManager::from_persisted(
        mock_api_url(&server),
        Session::authenticated(
            AccessToken::new("old-access"),
            Some(RefreshToken::new("long-lived")),
            0,
        ),
    );

    let session = manager.refresh().await.unwrap();

    assert_eq!(session.refresh_token, Some(RefreshToken::new("long-lived")));
    assert_eq!(session.exp, 1_900_000_000);
}

#[tokio::test]
async fn test_refresh_failure_sets_error_marker() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "InvalidRefreshToken",
            "message": "Refresh token revoked"
        })))
        .mount(&server)
        .await;

    let manager = RestSessionManager::from_persisted(
        mock_api_url(&server),
        Session::authenticated(
            AccessToken::new("old-access"),
            Some(RefreshToken::new("revoked")),
            0,
        ),
    );

    let session = manager.refresh().await.unwrap();

    assert_eq!(session.error.as_deref(), Some(REFRESH_ERROR));
    assert!(!session.has_usable_access_token());
    assert_eq!(manager.current().error.as_deref(), Some(REFRESH_ERROR));
}

#[tokio::test]
async fn test_refresh_without_refresh_token_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let manager = RestSessionManager::from_persisted(
        mock_api_url(&server),
        Session::authenticated(AccessToken::new("old-access"), None, 0),
    );

    let session = manager.refresh().await.unwrap();
    assert_eq!(session.error.as_deref(), Some(REFRESH_ERROR));
}

// ============================================================================
// Sign-out Tests
// ============================================================================

#[tokio::test]
async fn test_logout_notifies_backend() {
    let server = MockServer::start().await;
    mount_login(&server, "access", "refresh", now() + 3600).await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let manager = RestSessionManager::new(mock_api_url(&server));
    manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap();

    manager.logout().await.unwrap();

    assert_eq!(
        manager.current().status,
        AuthenticationStatus::Unauthenticated
    );
}

#[tokio::test]
async fn test_logout_clears_local_state_when_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let manager = RestSessionManager::from_persisted(
        mock_api_url(&server),
        Session::authenticated(AccessToken::new("access"), None, now() + 3600),
    );

    assert!(manager.logout().await.is_err());
    assert!(manager.current().access_token.is_none());
}

// ============================================================================
// Executor Tests
// ============================================================================

#[tokio::test]
async fn test_executor_passes_through_success() {
    let server = MockServer::start().await;
    mount_login(&server, "access", "refresh", now() + 3600).await;

    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("status", "submitted"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1, "status": "submitted"}],
            "page": 1,
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let manager = Arc::new(RestSessionManager::new(mock_api_url(&server)));
    manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap();

    let response = executor(&manager, &server)
        .execute(&RequestDescriptor::get("/applications?status=submitted"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_executor_refreshes_near_expiry_before_sending() {
    let server = MockServer::start().await;
    mount_login(&server, "expiring", "refresh", now() + 5).await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "fresh",
            "expiresIn": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cycles"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(RestSessionManager::new(mock_api_url(&server)));
    manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap();

    let response = executor(&manager, &server)
        .execute(&RequestDescriptor::get("/cycles"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_executor_retries_after_401_with_new_token() {
    let server = MockServer::start().await;
    mount_login(&server, "revoked", "refresh", now() + 3600).await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(header("authorization", "Bearer revoked"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "reissued",
            "expiresIn": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(header("authorization", "Bearer reissued"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(RestSessionManager::new(mock_api_url(&server)));
    manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap();

    let response = executor(&manager, &server)
        .execute(&RequestDescriptor::get("/reviews"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "[]");
}

#[tokio::test]
async fn test_executor_expires_session_when_refresh_rejected() {
    let server = MockServer::start().await;
    mount_login(&server, "revoked", "revoked-refresh", now() + 3600).await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(RestSessionManager::new(mock_api_url(&server)));
    manager
        .login(Credentials::new("rev@example.org", "secret"))
        .await
        .unwrap();

    let result = executor(&manager, &server)
        .execute(&RequestDescriptor::get("/users/me"))
        .await;

    assert!(matches!(result, Err(Error::Auth(AuthError::SessionExpired))));
}

#[tokio::test]
async fn test_transport_error_on_unreachable_backend() {
    // Bind and drop a listener to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = ApiUrl::new(format!("http://127.0.0.1:{port}")).unwrap();

    let manager = Arc::new(RestSessionManager::from_persisted(
        api.clone(),
        Session::authenticated(AccessToken::new("access"), None, now() + 3600),
    ));
    let executor = AuthenticatedRequestExecutor::new(manager, Arc::new(HttpTransport::new(api)));

    let result = executor
        .execute(&RequestDescriptor::get("/analytics/funnel"))
        .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_query_with_embedded_url_stays_on_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/callback"))
        .and(query_param("next", "https://app.example.org"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(RestSessionManager::from_persisted(
        mock_api_url(&server),
        Session::authenticated(AccessToken::new("access"), None, now() + 3600),
    ));

    let response = executor(&manager, &server)
        .execute(&RequestDescriptor::get(
            "/auth/callback?next=https://app.example.org",
        ))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_bearer_never_sent_to_other_origin() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let manager = Arc::new(RestSessionManager::from_persisted(
        mock_api_url(&server),
        Session::authenticated(AccessToken::new("access"), None, now() + 3600),
    ));
    let target = format!("{}/files/cv.pdf", elsewhere.uri());

    let result = executor(&manager, &server)
        .execute(&RequestDescriptor::get(target))
        .await;

    assert!(matches!(result, Err(Error::InvalidInput(_))));
}
