use reqwest::StatusCode;

use serde_json::{json, Value};

use crate::helpers::{error_message, TestApp};

#[tokio::test]
async fn create_returns_created_subscription() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let member_id = app.create_member(&token, "Ana Lima", "5550100").await;

    let res = app
        .post(
            &token,
            "api/subscriptions",
            &json!({
                "userId": member_id,
                "planName": "Monthly",
                "startDate": "2024-01-01",
                "endDate": "2024-01-31",
                "autoRenew": true
            }),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    let subscription: Value = res.json().await.unwrap();
    assert_eq!("1", subscription["id"]);
    assert_eq!(member_id.as_str(), subscription["userId"]);
    assert_eq!("2024-01-31", subscription["endDate"]);
    assert_eq!(true, subscription["autoRenew"]);

    let listed: Vec<Value> = app
        .get(&token, "api/subscriptions")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vec![subscription], listed);
}

#[tokio::test]
async fn create_rejects_unknown_member() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let res = app
        .post(
            &token,
            "api/subscriptions",
            &json!({
                "userId": "99",
                "planName": "Monthly",
                "startDate": "2024-01-01",
                "endDate": "2024-01-31"
            }),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!("Invalid userId", error_message(res).await);

    let persisted = app.persisted();
    assert!(persisted.subscriptions.is_empty());
    assert_eq!(1, persisted.next_subscription_id);
}

#[tokio::test]
async fn create_returns_bad_request_for_missing_data() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let member_id = app.create_member(&token, "Ana Lima", "5550100").await;

    let complete = json!({
        "userId": member_id,
        "planName": "Monthly",
        "startDate": "2024-01-01",
        "endDate": "2024-01-31"
    });

    for key in ["userId", "planName", "startDate", "endDate"] {
        let mut body = complete.clone();
        body.as_object_mut().unwrap().remove(key);

        let res = app
            .post(&token, "api/subscriptions", &body)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "missing {}", key);
        assert_eq!(
            "userId, planName, startDate, endDate are required",
            error_message(res).await
        );
    }
}

#[tokio::test]
async fn subscriptions_outlive_their_member() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let member_id = app.create_member(&token, "Ana Lima", "5550100").await;

    app.post(
        &token,
        "api/subscriptions",
        &json!({
            "userId": member_id,
            "planName": "Monthly",
            "startDate": "2024-01-01",
            "endDate": "2024-01-31"
        }),
    )
    .await
    .unwrap();
    app.delete(&token, &format!("api/users/{}", member_id))
        .await
        .unwrap();

    let listed: Vec<Value> = app
        .get(&token, "api/subscriptions")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(1, listed.len());
    assert_eq!(member_id.as_str(), listed[0]["userId"]);
}
