//! End-to-end flow: real listener, real Cognito client, mocked Cognito API.

use anyhow::{Context, Result};
use authgate::{
    api::{self, AuthConfig, AuthState},
    identity::{CognitoClient, CognitoConfig},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use reqwest::{header::SET_COOKIE, Client, StatusCode};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use wiremock::{
    matchers::{body_partial_json, header, method},
    Mock, MockServer, ResponseTemplate,
};

const TARGET: &str = "X-Amz-Target";

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn jwt(payload: &Value) -> String {
    let body = Base64UrlUnpadded::encode_string(payload.to_string().as_bytes());
    format!("eyJhbGciOiJSUzI1NiJ9.{body}.sig")
}

fn auth_result(refresh_token: Option<&str>) -> Value {
    let mut result = json!({
        "AccessToken": jwt(&json!({ "exp": 1_700_000_000, "auth_time": 1_699_999_000 })),
        "IdToken": jwt(&json!({ "email": "alice@example.com" })),
        "ExpiresIn": 3600,
        "TokenType": "Bearer"
    });
    if let (Some(token), Some(map)) = (refresh_token, result.as_object_mut()) {
        map.insert("RefreshToken".to_string(), json!(token));
    }
    json!({ "AuthenticationResult": result, "ChallengeParameters": {} })
}

/// Serve the gateway on an ephemeral port against the mocked provider.
async fn spawn_gateway(cognito: &MockServer) -> Result<SocketAddr> {
    let config = CognitoConfig::new("eu-central-1_Test".to_string(), "client-1".to_string())
        .with_endpoint(cognito.uri());
    let client = CognitoClient::new(&config)?;
    let state = Arc::new(AuthState::new(
        AuthConfig::new().with_cookie_domain(Some("example.com".to_string())),
        Arc::new(client),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = api::router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    Ok(addr)
}

fn cookie_of(response: &reqwest::Response) -> Result<String> {
    Ok(response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie")?
        .to_str()?
        .to_string())
}

#[tokio::test]
async fn login_refresh_logout() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let cognito = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(body_partial_json(json!({ "AuthFlow": "USER_PASSWORD_AUTH" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_result(Some("refresh-1"))))
        .expect(1)
        .mount(&cognito)
        .await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(body_partial_json(json!({
            "AuthFlow": "REFRESH_TOKEN_AUTH",
            "AuthParameters": { "REFRESH_TOKEN": "refresh-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_result(None)))
        .expect(1)
        .mount(&cognito)
        .await;

    let addr = spawn_gateway(&cognito).await?;
    let http = Client::new();

    let login = http
        .post(format!("http://{addr}/auth/login"))
        .json(&json!({ "email": "alice@example.com", "password": "Secret123!" }))
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = cookie_of(&login)?;
    assert_eq!(
        cookie,
        "token=refresh-1; Domain=example.com; Path=/; Expires=Thu, 14 Dec 2023 21:56:40 GMT; HttpOnly; Secure; SameSite=Strict"
    );
    let body: Value = login.json().await?;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["jwt_expired"], "2023-11-14T22:13:20.000Z");

    let refresh = http
        .get(format!("http://{addr}/auth/refresh-session"))
        .header("Cookie", "token=refresh-1")
        .send()
        .await?;
    assert_eq!(refresh.status(), StatusCode::OK);
    assert_eq!(cookie_of(&refresh)?, cookie);

    let logout = http
        .post(format!("http://{addr}/auth/logout"))
        .send()
        .await?;
    assert_eq!(logout.status(), StatusCode::OK);
    assert!(cookie_of(&logout)?.starts_with("token=; Domain=example.com; Path=/; Expires="));
    let body: Value = logout.json().await?;
    assert_eq!(body, json!({ "message": "Success" }));

    Ok(())
}

#[tokio::test]
async fn signup_then_confirm() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let cognito = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.SignUp"))
        .and(body_partial_json(json!({
            "ClientId": "client-1",
            "Username": "alice@example.com",
            "Password": "Secret123!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserConfirmed": false,
            "UserSub": "6f1e2d3c-0000-4000-8000-000000000001"
        })))
        .expect(1)
        .mount(&cognito)
        .await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.ConfirmSignUp"))
        .and(body_partial_json(json!({ "ConfirmationCode": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&cognito)
        .await;

    let addr = spawn_gateway(&cognito).await?;
    let http = Client::new();

    let signup = http
        .post(format!("http://{addr}/auth/signup"))
        .form(&[("email", "alice@example.com"), ("password", "Secret123!")])
        .send()
        .await?;
    assert_eq!(signup.status(), StatusCode::OK);
    let body: Value = signup.json().await?;
    assert_eq!(body["user_sub"], "6f1e2d3c-0000-4000-8000-000000000001");
    assert_eq!(body["user_confirmed"], false);

    let confirm = http
        .post(format!("http://{addr}/auth/confirm"))
        .json(&json!({ "email": "alice@example.com", "code": "123456" }))
        .send()
        .await?;
    assert_eq!(confirm.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn provider_rejections_are_relayed() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let cognito = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "NotAuthorizedException",
            "message": "Refresh Token has been revoked"
        })))
        .mount(&cognito)
        .await;

    let addr = spawn_gateway(&cognito).await?;
    let http = Client::new();

    let refresh = http
        .get(format!("http://{addr}/auth/refresh-session"))
        .header("Cookie", "token=revoked")
        .send()
        .await?;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
    assert!(refresh.headers().get(SET_COOKIE).is_none());
    let body: Value = refresh.json().await?;
    assert_eq!(body, json!({ "message": "Refresh Token has been revoked" }));

    let login = http
        .post(format!("http://{addr}/auth/login"))
        .json(&json!({ "email": "alice@example.com", "password": "nope" }))
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
