use actix_web::http::header::HeaderMap;

use chrono::Duration;

use secrecy::Secret;

use serde::{Deserialize, Serialize};

use crate::crypto::{SessionClaims, SigningKey};
use crate::domain::Role;
use crate::error::{Error, Result};

use super::BearerToken;

/// Validity of every issued session token
pub fn session_lifetime() -> Duration {
    Duration::days(7)
}

/// A staff account allowed to log in, supplied through settings
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: Secret<String>,
}

/// Who is behind a request, as decoded from the session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl From<&CredentialRecord> for SessionClaims {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            sub: record.id.clone(),
            email: record.email.clone(),
            name: record.name.clone(),
            role: record.role,
        }
    }
}

/// Successful login: the session token and the identity it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

/// Issues session tokens for known credentials and validates them afterwards.
///
/// Authentication only: every valid identity may call every endpoint, whatever
/// its role.
#[derive(Debug, Clone)]
pub struct AuthGate {
    key: SigningKey,
    credentials: Vec<CredentialRecord>,
}

impl AuthGate {
    pub fn new(key: SigningKey, credentials: Vec<CredentialRecord>) -> Self {
        if credentials.is_empty() {
            tracing::warn!("No credentials configured, nobody will be able to log in");
        }
        Self { key, credentials }
    }

    /// Exchange an email/password pair for a signed session token
    #[tracing::instrument(name = "Log in", skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        use secrecy::ExposeSecret;

        let record = self
            .credentials
            .iter()
            .find(|c| c.email == email && c.password.expose_secret() == password)
            .ok_or(Error::InvalidCredentials)?;

        let claims = SessionClaims::from(record);
        let token = claims
            .sign(&self.key, session_lifetime())
            .map_err(Error::TokenSigning)?;

        Ok(LoginResponse {
            token: token.to_string(),
            user: claims.into(),
        })
    }

    /// Resolve the identity behind an `Authorization: Bearer` header
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity> {
        let bearer = BearerToken::from_headers(headers).map_err(|e| {
            tracing::debug!("Rejected request without bearer token: {}", e);
            Error::MissingToken(e.to_string())
        })?;

        self.verify(bearer.as_ref())
    }

    /// Check signature and expiry of a raw token
    pub fn verify(&self, token: &str) -> Result<Identity> {
        SessionClaims::verify(&self.key, token)
            .map(Identity::from)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                Error::TokenVerification(e)
            })
    }
}
