use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};

use secrecy::Secret;

use serde::Serialize;
use serde_json::Value;

use tempfile::TempDir;

use gymdesk::app;
use gymdesk::auth::{AuthGate, CredentialRecord};
use gymdesk::crypto::SigningKey;
use gymdesk::domain::Role;
use gymdesk::repo::{self, Snapshot, Store};
use gymdesk::telemetry;

lazy_static::lazy_static! {
    // Set `TEST_LOG` to see server logs while testing
    static ref TRACING: () = {
        let installed = if std::env::var("TEST_LOG").is_ok() {
            telemetry::set_subscriber(telemetry::create_subscriber("debug", std::io::stdout))
        } else {
            telemetry::set_subscriber(telemetry::create_subscriber("debug", std::io::sink))
        };
        installed.expect("Failed to set up test telemetry");
    };
}

pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "password123";
pub const TRAINER_EMAIL: &str = "trainer@example.com";
pub const TRAINER_PASSWORD: &str = "trainer123";

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn admin() -> Self {
        Self {
            email: Some(ADMIN_EMAIL.into()),
            password: Some(ADMIN_PASSWORD.into()),
        }
    }
}

fn credentials() -> Vec<CredentialRecord> {
    vec![
        CredentialRecord {
            id: "admin-1".into(),
            email: ADMIN_EMAIL.into(),
            name: "Gym Owner".into(),
            role: Role::Admin,
            password: Secret::new(ADMIN_PASSWORD.into()),
        },
        CredentialRecord {
            id: "trainer-1".into(),
            email: TRAINER_EMAIL.into(),
            name: "Lead Trainer".into(),
            role: Role::Trainer,
            password: Secret::new(TRAINER_PASSWORD.into()),
        },
    ]
}

pub struct TestApp {
    pub addr: String,
    pub client: Client,

    data_dir: Arc<TempDir>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create data directory");
        Self::spawn_in(Arc::new(data_dir)).await
    }

    /// A fresh server process reading the same snapshot file
    pub async fn restart(&self) -> Self {
        Self::spawn_in(self.data_dir.clone()).await
    }

    async fn spawn_in(data_dir: Arc<TempDir>) -> Self {
        use rand::{distributions::Alphanumeric, Rng};

        lazy_static::initialize(&TRACING);

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let signing_key = {
            let rand_key: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(32)
                .map(char::from)
                .collect();
            let rand_key = Secret::new(rand_key);

            SigningKey::new(&rand_key).expect("Failed to create crypto signing key")
        };

        let store = Store::open(data_path(data_dir.path()));
        let gate = AuthGate::new(signing_key, credentials());

        let server = app::run(listener, store, gate).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        Self {
            addr,
            client: Client::new(),
            data_dir,
        }
    }

    pub fn data_path(&self) -> PathBuf {
        data_path(self.data_dir.path())
    }

    /// What is currently on disk
    pub fn persisted(&self) -> Snapshot {
        repo::load(&self.data_path())
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub fn authorized_request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        let req = self.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn login(&self, credentials: &Credentials) -> reqwest::Result<Response> {
        self.request(Method::POST, "api/auth/login")
            .json(credentials)
            .send()
            .await
    }

    /// Token of a signed-in admin
    pub async fn admin_token(&self) -> String {
        let body: Value = self
            .login(&Credentials::admin())
            .await
            .expect("Failed to execute login request")
            .json()
            .await
            .expect("Failed to parse login response");

        body["token"]
            .as_str()
            .expect("Login response without token")
            .to_string()
    }

    pub async fn get(&self, token: &str, url: &str) -> reqwest::Result<Response> {
        self.authorized_request(Method::GET, url, Some(token))
            .send()
            .await
    }

    pub async fn post(&self, token: &str, url: &str, body: &Value) -> reqwest::Result<Response> {
        self.authorized_request(Method::POST, url, Some(token))
            .json(body)
            .send()
            .await
    }

    pub async fn put(&self, token: &str, url: &str, body: &Value) -> reqwest::Result<Response> {
        self.authorized_request(Method::PUT, url, Some(token))
            .json(body)
            .send()
            .await
    }

    pub async fn delete(&self, token: &str, url: &str) -> reqwest::Result<Response> {
        self.authorized_request(Method::DELETE, url, Some(token))
            .send()
            .await
    }

    /// Create a member and return its id
    pub async fn create_member(&self, token: &str, name: &str, phone: &str) -> String {
        let body: Value = self
            .post(
                token,
                "api/users",
                &serde_json::json!({ "name": name, "phone": phone }),
            )
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse created member");

        body["id"].as_str().expect("Member without id").to_string()
    }
}

fn data_path(dir: &Path) -> PathBuf {
    dir.join("data.json")
}

/// The `message` of an error response
pub async fn error_message(res: Response) -> String {
    let body: Value = res.json().await.expect("Error response is not JSON");
    body["message"]
        .as_str()
        .expect("Error response without message")
        .to_string()
}
