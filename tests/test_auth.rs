mod common;

#[tokio::test]
async fn login_success_returns_token_and_cookie() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server
        .post("/api/login")
        .json(&serde_json::json!({
            "username": common::ADMIN_USERNAME,
            "password": common::ADMIN_PASSWORD,
        }))
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"].as_bool(), Some(true));
    assert_eq!(body["username"].as_str(), Some("admin"));

    let token = body["token"].as_str().expect("token missing");
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("Set-Cookie missing")
        .to_str()
        .unwrap()
        .to_string();
    let cookie = cookie::Cookie::parse(set_cookie).unwrap();
    assert_eq!(cookie.name(), "token");
    assert_eq!(cookie.value(), token);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(cookie::SameSite::Lax));
    assert_eq!(cookie.max_age(), Some(cookie::time::Duration::days(7)));
}

#[tokio::test]
async fn login_invalid_credentials() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/api/login")
        .json(&serde_json::json!({
            "username": common::ADMIN_USERNAME,
            "password": "wrongpassword",
        }))
        .await;

    response.assert_status_unauthorized();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"].as_str(), Some("Invalid credentials"));
}

#[tokio::test]
async fn mutating_endpoint_requires_token() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/api/businesses")
        .json(&serde_json::json!({ "name": "Test Co" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/api/businesses")
        .authorization_bearer("deadbeef")
        .json(&serde_json::json!({ "name": "Test Co" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn issued_token_works_as_bearer() {
    let env = common::TestEnv::start().await;
    let server = env.server();
    let token = env.login(&server).await;

    let response = server
        .post("/api/businesses")
        .authorization_bearer(&token)
        .json(&serde_json::json!({ "name": "Test Co" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn session_cookie_authenticates_without_header() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    // Login stores the token cookie on the server client
    env.login(&server).await;

    let response = server
        .post("/api/team")
        .json(&serde_json::json!({
            "name": "Ada",
            "title": "General Manager",
            "image": "/staff.jpg",
            "description": "Runs the place",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
}

#[tokio::test]
async fn logout_invalidates_session() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();
    let token = env.login(&server).await;

    server
        .post("/api/logout")
        .authorization_bearer(&token)
        .expect_success()
        .await;

    // The same token must no longer authenticate
    let response = server
        .post("/api/businesses")
        .authorization_bearer(&token)
        .json(&serde_json::json!({ "name": "Test Co" }))
        .await;

    response.assert_status_unauthorized();
}
