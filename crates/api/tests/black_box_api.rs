use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use accessmate_api::app::{self, config::AppConfig, services};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the prod router over in-memory services, bound to an ephemeral
    /// port. The optional admin seed exercises the admin tier.
    async fn spawn(with_admin: bool) -> Self {
        let mut config = AppConfig::for_tests("test-secret");
        if with_admin {
            config.admin_email = Some("root@example.com".to_string());
            config.admin_password = Some("root-password".to_string());
        }

        let services = Arc::new(services::build_services(&config).await);
        let app = app::build_app_with_services(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "email": email,
            "display_name": "Test User",
            "password": password,
        }))
        .send()
        .await
        .unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str, password: &str) -> String {
    let res = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    for path in ["/me", "/profiles", "/sessions", "/feedback"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }
}

#[tokio::test]
async fn public_paths_pass_through_regardless_of_authorization_header() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    // No route is mounted under the docs prefixes; a plain 404 (not 401, not
    // 500) proves the filter forwarded the request untouched.
    let res = client
        .get(format!("{}/swagger-ui/index.html", srv.base_url))
        .header("Authorization", "Bearer garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Health does not require a token either.
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_login_and_me_round_trip() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    let res = register(&client, &srv.base_url, "Alice@Example.com", "hunter2hunter2").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["email"], "alice@example.com");
    assert!(created.get("password_hash").is_none());

    // Email uniqueness.
    let res = register(&client, &srv.base_url, "alice@example.com", "hunter2hunter2").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Wrong password.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "alice@example.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = login(&client, &srv.base_url, "alice@example.com", "hunter2hunter2").await;

    let res = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["role"], "user");
}

#[tokio::test]
async fn admin_tier_is_required_for_user_administration() {
    let srv = TestServer::spawn(true).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "bob@example.com", "hunter2hunter2").await;
    let user_token = login(&client, &srv.base_url, "bob@example.com", "hunter2hunter2").await;

    let res = client
        .get(format!("{}/users", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin_token = login(&client, &srv.base_url, "root@example.com", "root-password").await;
    let res = client
        .get(format!("{}/users", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn suspension_revokes_access_immediately() {
    let srv = TestServer::spawn(true).await;
    let client = reqwest::Client::new();

    let res = register(&client, &srv.base_url, "carol@example.com", "hunter2hunter2").await;
    let created: serde_json::Value = res.json().await.unwrap();
    let user_id = created["id"].as_str().unwrap().to_string();

    let user_token = login(&client, &srv.base_url, "carol@example.com", "hunter2hunter2").await;
    let admin_token = login(&client, &srv.base_url, "root@example.com", "root-password").await;

    let res = client
        .post(format!("{}/users/{}/suspend", srv.base_url, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The still-unexpired token no longer authenticates: the identity lookup
    // refuses suspended users, so the request proceeds without identity.
    let res = client
        .get(format!("{}/me", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // And logging in again is refused outright.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "carol@example.com", "password": "hunter2hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_crud_round_trip() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "dave@example.com", "hunter2hunter2").await;
    let token = login(&client, &srv.base_url, "dave@example.com", "hunter2hunter2").await;

    let res = client
        .post(format!("{}/profiles", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "kind": "visual",
            "severity": "moderate",
            "assistive_technologies": ["screen reader"],
            "preferences": { "contrast": "high" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let profile: serde_json::Value = res.json().await.unwrap();
    let profile_id = profile["id"].as_str().unwrap().to_string();

    // One profile per kind.
    let res = client
        .post(format!("{}/profiles", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "kind": "visual", "severity": "mild" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .get(format!("{}/profiles", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let res = client
        .patch(format!("{}/profiles/{}", srv.base_url, profile_id))
        .bearer_auth(&token)
        .json(&json!({ "severity": "severe" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["severity"], "severe");

    let res = client
        .delete(format!("{}/profiles/{}", srv.base_url, profile_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/profiles/{}", srv.base_url, profile_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_flow_with_artifacts() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "erin@example.com", "hunter2hunter2").await;
    let token = login(&client, &srv.base_url, "erin@example.com", "hunter2hunter2").await;

    let res = client
        .post(format!("{}/agents", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Reader", "language": "en" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let config: serde_json::Value = res.json().await.unwrap();
    let config_id = config["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/sessions", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "agent_config_id": config_id, "device": "android-tablet" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let session: serde_json::Value = res.json().await.unwrap();
    let session_id = session["id"].as_str().unwrap().to_string();
    assert_eq!(session["status"], "active");

    // Voice command goes through the (mock) agent client.
    let res = client
        .post(format!("{}/sessions/{}/voice-commands", srv.base_url, session_id))
        .bearer_auth(&token)
        .json(&json!({ "phrase": "open settings" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let command: serde_json::Value = res.json().await.unwrap();
    assert_eq!(command["status"], "interpreted");
    assert_eq!(command["intent"], "assist.generic");

    // Subtitle windows are validated.
    let res = client
        .post(format!("{}/sessions/{}/subtitles", srv.base_url, session_id))
        .bearer_auth(&token)
        .json(&json!({ "text": "hello", "language": "en", "start_ms": 500, "end_ms": 100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/sessions/{}/subtitles", srv.base_url, session_id))
        .bearer_auth(&token)
        .json(&json!({ "text": "hello", "language": "en", "start_ms": 0, "end_ms": 900 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Layout analysis records the mock agent's findings.
    let res = client
        .post(format!("{}/sessions/{}/layout-analyses", srv.base_url, session_id))
        .bearer_auth(&token)
        .json(&json!({
            "source": "https://example.com/checkout",
            "content": { "elements": [{"tag": "img"}, {"tag": "button"}] },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let analysis: serde_json::Value = res.json().await.unwrap();
    assert_eq!(analysis["elements_total"], 2);
    assert_eq!(analysis["issues"].as_array().unwrap().len(), 1);

    // End the session; artifacts are then refused, ending twice conflicts.
    let res = client
        .post(format!("{}/sessions/{}/end", srv.base_url, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/sessions/{}/end", srv.base_url, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(format!("{}/sessions/{}/voice-commands", srv.base_url, session_id))
        .bearer_auth(&token)
        .json(&json!({ "phrase": "too late" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn foreign_sessions_are_invisible() {
    let srv = TestServer::spawn(false).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "frank@example.com", "hunter2hunter2").await;
    register(&client, &srv.base_url, "grace@example.com", "hunter2hunter2").await;
    let frank = login(&client, &srv.base_url, "frank@example.com", "hunter2hunter2").await;
    let grace = login(&client, &srv.base_url, "grace@example.com", "hunter2hunter2").await;

    let res = client
        .post(format!("{}/sessions", srv.base_url))
        .bearer_auth(&frank)
        .json(&json!({ "device": "kiosk-1" }))
        .send()
        .await
        .unwrap();
    let session: serde_json::Value = res.json().await.unwrap();
    let session_id = session["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/sessions/{}", srv.base_url, session_id))
        .bearer_auth(&grace)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feedback_flow() {
    let srv = TestServer::spawn(true).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "hana@example.com", "hunter2hunter2").await;
    let token = login(&client, &srv.base_url, "hana@example.com", "hunter2hunter2").await;

    let res = client
        .post(format!("{}/feedback", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "rating": 0, "comment": "broken" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/feedback", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "rating": 4, "category": "suggestion", "comment": "bigger captions" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/feedback", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // Only admins see the full stream.
    let res = client
        .get(format!("{}/feedback/all", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin_token = login(&client, &srv.base_url, "root@example.com", "root-password").await;
    let res = client
        .get(format!("{}/feedback/all", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
