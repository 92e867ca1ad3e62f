use std::time::Duration;

use claims::{assert_err, assert_ok};

use reqwest::StatusCode;

use url::Url;

use gymdesk::client::{ApiClient, MemorySessionStore, SessionClient};
use gymdesk::model::{MemberChanges, NewMember, NewSubscription, NewWorkout};
use gymdesk::views::{MemberDirectory, MemberForm, SubscriptionStatus};

use crate::helpers::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

fn api_client(app: &TestApp) -> ApiClient<MemorySessionStore> {
    let base_url = Url::parse(&format!("{}/api/", app.addr)).unwrap();
    let session = SessionClient::new(MemorySessionStore::default());

    ApiClient::new(base_url, Duration::from_secs(5), session).unwrap()
}

#[tokio::test]
async fn client_round_trip_against_the_server() {
    let app = TestApp::spawn().await;
    let client = api_client(&app);

    let err = assert_err!(client.list_members().await);
    assert!(err.is_unauthorized());

    let login = assert_ok!(client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await);
    assert_eq!(login.user, assert_ok!(client.me().await));

    let form = MemberForm {
        name: "Ana Lima".into(),
        phone: "+1 (555) 010-0100".into(),
        email: String::new(),
        whatsapp_opt_in: true,
    };
    let new_member: NewMember = form.validate().unwrap();
    let member = assert_ok!(client.create_member(&new_member).await);

    let changes = MemberChanges {
        email: Some(Some("ana@example.com".into())),
        ..Default::default()
    };
    let updated = assert_ok!(client.update_member(&member.id, &changes).await);
    assert_eq!(Some("ana@example.com".to_string()), updated.email);
    assert_eq!(updated, assert_ok!(client.get_member(&member.id).await));

    let subscription = assert_ok!(
        client
            .create_subscription(&NewSubscription {
                user_id: member.id.clone(),
                plan_name: "Monthly".into(),
                start_date: "2024-01-01".into(),
                end_date: "2024-01-31".into(),
                auto_renew: false,
            })
            .await
    );
    let workout = assert_ok!(
        client
            .create_workout(
                &member.id,
                &NewWorkout {
                    month: "January 2024".into(),
                    content: "Squats 5x5, bench 3x8".into(),
                    pdf_url: None,
                },
            )
            .await
    );

    let members = assert_ok!(client.list_members().await);
    let directory = MemberDirectory::new(&members);
    let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 28).unwrap();

    assert_eq!(
        SubscriptionStatus::ExpiringSoon,
        SubscriptionStatus::of(&subscription, today)
    );
    assert!(directory.renewal_link(&subscription, today).is_some());
    assert!(directory.workout_link(&workout).is_some());
    assert_eq!(vec![workout], assert_ok!(client.list_workouts(Some(&member.id)).await));

    assert_ok!(client.delete_member(&member.id).await);
    let err = assert_err!(client.get_member(&member.id).await);
    assert_eq!(Some(StatusCode::NOT_FOUND), err.status());
    assert_eq!("User not found", err.to_string());

    assert_ok!(client.logout().await);
    assert!(!client.session().is_authenticated().await.unwrap());
}

#[tokio::test]
async fn client_surfaces_validation_messages() {
    let app = TestApp::spawn().await;
    let client = api_client(&app);
    client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    let err = assert_err!(
        client
            .create_subscription(&NewSubscription {
                user_id: "99".into(),
                plan_name: "Monthly".into(),
                start_date: "2024-01-01".into(),
                end_date: "2024-01-31".into(),
                auto_renew: false,
            })
            .await
    );

    assert_eq!(Some(StatusCode::BAD_REQUEST), err.status());
    assert_eq!("Invalid userId", err.to_string());
}

#[tokio::test]
async fn wrong_credentials_leave_the_session_empty() {
    let app = TestApp::spawn().await;
    let client = api_client(&app);

    let err = assert_err!(client.login(ADMIN_EMAIL, "not-the-password").await);

    assert!(err.is_unauthorized());
    assert!(!client.session().is_authenticated().await.unwrap());
}
