//! End-to-end tests for the privileged API proxy.
//!
//! The proxy must resolve the caller's role against the identity backend on
//! every request, forward only on an admin role, and stream the backend's
//! answer back verbatim.

use inkstone_integration_tests::{
    TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD, spawn_backend, spawn_gateway,
};
use reqwest::{StatusCode, header, redirect};
use serde_json::json;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("failed to build client")
}

async fn login(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD}))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login set no cookie")
        .to_str()
        .expect("ascii");
    let (name_value, _) = set_cookie.split_once(';').expect("cookie attributes");
    let (_, token) = name_value.split_once('=').expect("cookie name=value");
    token.to_string()
}

#[tokio::test]
async fn test_proxy_forwards_with_bearer_and_streams_back() {
    let backend = spawn_backend("admin").await;
    let gateway = spawn_gateway(backend.addr).await;
    let base = format!("http://{gateway}");
    let client = client();

    let token = login(&client, &base).await;

    let response = client
        .post(format!("{base}/api/admin/blogs?draft=true"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"title":"Hello"}"#)
        .send()
        .await
        .expect("proxy request failed");

    // The stub answers 201; the proxy must not reinterpret it.
    assert_eq!(response.status(), StatusCode::CREATED);

    let echo: serde_json::Value = response.json().await.expect("echo body");
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["path"], "/blogs");
    assert_eq!(echo["query"], "draft=true");
    assert_eq!(echo["body"], r#"{"title":"Hello"}"#);
    // The session token passed through unchanged as the bearer credential.
    assert_eq!(echo["authorization"], format!("Bearer {token}"));

    assert_eq!(backend.forwarded(), 1);
}

#[tokio::test]
async fn test_proxy_with_editor_role_denies_and_does_not_forward() {
    let backend = spawn_backend("editor").await;
    let gateway = spawn_gateway(backend.addr).await;
    let base = format!("http://{gateway}");
    let client = client();

    login(&client, &base).await;

    let response = client
        .post(format!("{base}/api/admin/blogs"))
        .json(&json!({"title":"Hello"}))
        .send()
        .await
        .expect("proxy request failed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await.expect("body"), "unauthorized");
    // Authorization failed, so nothing may have reached the backend's
    // content endpoints.
    assert_eq!(backend.forwarded(), 0);
    // The role check itself did go upstream.
    assert!(backend.identity_checks() >= 1);
}

#[tokio::test]
async fn test_proxy_without_cookie_denies_without_backend_traffic() {
    let backend = spawn_backend("admin").await;
    let gateway = spawn_gateway(backend.addr).await;
    let client = client();

    let response = client
        .delete(format!("http://{gateway}/api/admin/users/42"))
        .send()
        .await
        .expect("proxy request failed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.forwarded(), 0);
    assert_eq!(backend.identity_checks(), 0);
}

#[tokio::test]
async fn test_proxy_with_forged_cookie_is_screened_locally() {
    let backend = spawn_backend("admin").await;
    let gateway = spawn_gateway(backend.addr).await;
    let client = client();

    let response = client
        .post(format!("http://{gateway}/api/admin/blogs"))
        .header(
            header::COOKIE,
            "inkstone_admin_session=deadbeefdeadbeef:ffffffffffffffff",
        )
        .json(&json!({"title":"Hello"}))
        .send()
        .await
        .expect("proxy request failed");

    // A forged local token dies before any backend traffic.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.forwarded(), 0);
    assert_eq!(backend.identity_checks(), 0);
}

#[tokio::test]
async fn test_proxy_passes_backend_denials_through() {
    // An authorized admin whose forwarded call the backend itself rejects
    // must see the backend's answer, not the gateway's.
    let backend = spawn_backend("admin").await;
    let gateway = spawn_gateway(backend.addr).await;
    let base = format!("http://{gateway}");
    let client = client();

    login(&client, &base).await;

    let response = client
        .get(format!("{base}/api/admin/projects/missing"))
        .send()
        .await
        .expect("proxy request failed");

    // Status comes from the stub verbatim (201 for echo responses).
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(backend.forwarded(), 1);
}

#[tokio::test]
async fn test_unavailable_backend_reads_as_unauthenticated() {
    // Point the gateway at a dead port: the resolver must fail closed with
    // a 401, never a 5xx or an allow. Bind-and-drop yields a port with
    // nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let unused = listener.local_addr().expect("probe addr");
    drop(listener);

    let gateway = spawn_gateway(unused).await;
    let base = format!("http://{gateway}");
    let client = client();

    // Login is local and still works with the backend down.
    let login_response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD}))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(login_response.status(), StatusCode::NO_CONTENT);

    let response = client
        .post(format!("{base}/api/admin/blogs"))
        .json(&json!({"title":"Hello"}))
        .send()
        .await
        .expect("proxy request failed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
