use std::time::Duration;

use anyhow::Context;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use url::Url;

use crate::auth::{BearerToken, Identity, LoginResponse};
use crate::model::{
    Member, MemberChanges, NewMember, NewSubscription, NewWorkout, Subscription, Workout,
};
use crate::settings::ClientSettings;

use super::{SessionClient, SessionStore};

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Request failed")]
    Http(#[from] reqwest::Error),

    #[error("Session storage failed: {0}")]
    Session(anyhow::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// The session was rejected and should be dropped
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Typed client for the gym REST API.
///
/// Every request carries the stored session token, when there is one.
#[derive(Debug)]
pub struct ApiClient<S> {
    client: Client,
    base_url: Url,
    session: SessionClient<S>,
}

impl<S: SessionStore> ApiClient<S> {
    pub fn new(
        base_url: Url,
        timeout: Duration,
        session: SessionClient<S>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client")?;

        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL {} cannot carry a path", base_url);
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn from_settings(settings: &ClientSettings, session: SessionClient<S>) -> anyhow::Result<Self> {
        Self::new(settings.base_url()?, settings.timeout(), session)
    }

    pub fn session(&self) -> &SessionClient<S> {
        &self.session
    }

    /// Exchange credentials for a session and remember it
    #[tracing::instrument(name = "Log in", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let login: LoginResponse = self
            .send(
                self.request(Method::POST, &["auth", "login"])
                    .await?
                    .json(&LoginRequest { email, password }),
            )
            .await?;

        self.session
            .set_token(&login.token)
            .await
            .map_err(ClientError::Session)?;
        self.session
            .set_user(&login.user)
            .await
            .map_err(ClientError::Session)?;

        Ok(login)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.session.logout().await.map_err(ClientError::Session)
    }

    pub async fn me(&self) -> ClientResult<Identity> {
        self.send(self.request(Method::GET, &["auth", "me"]).await?).await
    }

    pub async fn list_members(&self) -> ClientResult<Vec<Member>> {
        self.send(self.request(Method::GET, &["users"]).await?).await
    }

    pub async fn get_member(&self, id: &str) -> ClientResult<Member> {
        self.send(self.request(Method::GET, &["users", id]).await?)
            .await
    }

    pub async fn create_member(&self, new_member: &NewMember) -> ClientResult<Member> {
        let req = self.request(Method::POST, &["users"]).await?.json(new_member);
        self.send(req).await
    }

    pub async fn update_member(&self, id: &str, changes: &MemberChanges) -> ClientResult<Member> {
        let req = self
            .request(Method::PUT, &["users", id])
            .await?
            .json(changes);
        self.send(req).await
    }

    pub async fn delete_member(&self, id: &str) -> ClientResult<()> {
        let res = self
            .request(Method::DELETE, &["users", id])
            .await?
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    pub async fn create_subscription(
        &self,
        new_subscription: &NewSubscription,
    ) -> ClientResult<Subscription> {
        let req = self
            .request(Method::POST, &["subscriptions"])
            .await?
            .json(new_subscription);
        self.send(req).await
    }

    pub async fn list_subscriptions(&self) -> ClientResult<Vec<Subscription>> {
        self.send(self.request(Method::GET, &["subscriptions"]).await?)
            .await
    }

    /// All workouts, or only those of `user_id`
    pub async fn list_workouts(&self, user_id: Option<&str>) -> ClientResult<Vec<Workout>> {
        let segments = match user_id {
            Some(id) => vec!["users", id, "workouts"],
            None => vec!["workouts"],
        };
        self.send(self.request(Method::GET, &segments).await?).await
    }

    pub async fn create_workout(
        &self,
        user_id: &str,
        new_workout: &NewWorkout,
    ) -> ClientResult<Workout> {
        let req = self
            .request(Method::POST, &["users", user_id, "workouts"])
            .await?
            .json(new_workout);
        self.send(req).await
    }

    /// `base_url` extended by `segments`, each percent-encoded as a single segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let req = self.client.request(method, self.endpoint(segments));

        let token = self.session.token().await.map_err(ClientError::Session)?;
        Ok(match token {
            Some(token) => req.header(
                reqwest::header::AUTHORIZATION,
                BearerToken::header_value(&token),
            ),
            None => req,
        })
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let res = check(req.send().await?).await?;
        Ok(res.json().await?)
    }
}

/// Turn non-success responses into `ClientError::Api`, keeping the server's message
async fn check(res: Response) -> ClientResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    tracing::warn!(%status, %message, "API request rejected");

    Err(ClientError::Api { status, message })
}
