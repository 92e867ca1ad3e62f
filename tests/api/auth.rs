use reqwest::{Method, StatusCode};

use serde_json::Value;

use crate::helpers::{error_message, Credentials, TestApp, TRAINER_EMAIL, TRAINER_PASSWORD};

#[tokio::test]
async fn login_returns_token_and_identity() {
    let app = TestApp::spawn().await;

    let res = app
        .login(&Credentials::admin())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let body: Value = res.json().await.unwrap();
    assert!(body["token"].as_str().map_or(false, |t| !t.is_empty()));
    assert_eq!("admin-1", body["user"]["id"]);
    assert_eq!("Gym Owner", body["user"]["name"]);
    assert_eq!("admin", body["user"]["role"]);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn trainers_can_log_in() {
    let app = TestApp::spawn().await;

    let res = app
        .login(&Credentials {
            email: Some(TRAINER_EMAIL.into()),
            password: Some(TRAINER_PASSWORD.into()),
        })
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("trainer", body["user"]["role"]);
}

#[tokio::test]
async fn login_returns_bad_request_for_missing_fields() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        (
            "missing password",
            Credentials {
                email: Some("owner@example.com".into()),
                password: None,
            },
        ),
        (
            "missing email",
            Credentials {
                email: None,
                password: Some("password123".into()),
            },
        ),
        (
            "empty email",
            Credentials {
                email: Some(String::new()),
                password: Some("password123".into()),
            },
        ),
    ];

    for (desc, credentials) in test_cases {
        let res = app
            .login(&credentials)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", desc);
        assert_eq!("email and password are required", error_message(res).await);
    }
}

#[tokio::test]
async fn login_returns_unauthorized_for_wrong_credentials() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        ("wrong password", "owner@example.com", "password124"),
        ("unknown email", "nobody@example.com", "password123"),
        ("mismatched pair", "owner@example.com", "trainer123"),
        ("email case", "Owner@example.com", "password123"),
    ];

    for (desc, email, password) in test_cases {
        let res = app
            .login(&Credentials {
                email: Some(email.into()),
                password: Some(password.into()),
            })
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{}", desc);
        assert_eq!("Invalid credentials", error_message(res).await);
    }
}

#[tokio::test]
async fn me_echoes_the_token_identity() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .get(&token, "api/auth/me")
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("admin-1", body["id"]);
    assert_eq!("owner@example.com", body["email"]);
    assert_eq!("admin", body["role"]);
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        (Method::GET, "api/auth/me"),
        (Method::GET, "api/users"),
        (Method::POST, "api/users"),
        (Method::GET, "api/users/1"),
        (Method::DELETE, "api/users/1"),
        (Method::GET, "api/subscriptions"),
        (Method::GET, "api/workouts"),
        (Method::POST, "api/users/1/workouts"),
    ];

    for (method, url) in test_cases {
        let res = app
            .request(method.clone(), url)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{} {}", method, url);
        assert_eq!("Missing token", error_message(res).await);
    }
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (message, signature) = token.split_once('.').unwrap();
    let tampered = format!("{}x.{}", message, signature);

    for bad_token in [tampered.as_str(), "abc.def", "not-a-token"] {
        let res = app
            .get(bad_token, "api/users")
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{}", bad_token);
        assert_eq!("Invalid token", error_message(res).await);
    }
}

#[tokio::test]
async fn tokens_from_another_server_are_rejected() {
    let app = TestApp::spawn().await;
    let other = TestApp::spawn().await;
    let token = other.admin_token().await;

    let res = app
        .get(&token, "api/users")
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}

#[tokio::test]
async fn other_authorization_schemes_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .request(Method::GET, "api/users")
        .header("Authorization", format!("Token {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}

#[tokio::test]
async fn unknown_api_paths_authenticate_first() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let test_cases = vec![
        (Method::GET, "api/nothing-here"),
        (Method::GET, "api/auth/nothing-here"),
        (Method::DELETE, "api/subscriptions/1"),
        (Method::PUT, "api/subscriptions"),
        (Method::GET, "api/users/1/extra"),
        (Method::PATCH, "api/users/1"),
        (Method::GET, "api/workouts/1"),
        (Method::DELETE, "api/workouts"),
    ];

    for (method, url) in test_cases {
        let res = app
            .authorized_request(method.clone(), url, None)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "anonymous {} {}", method, url);

        let res = app
            .authorized_request(method.clone(), url, Some(&token))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(StatusCode::NOT_FOUND, res.status(), "signed in {} {}", method, url);
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let res = app
        .request(Method::POST, "api/auth/login")
        .header("Content-Type", "application/json")
        .body("{\"email\": ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
}
