use actix_web::http::header::{self, HeaderMap};

use anyhow::Context;

const BEARER_AUTH_PREFIX: &str = "Bearer ";

/// Raw token taken from an `Authorization: Bearer <token>` header
#[derive(Debug, Clone, PartialEq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Extract the bearer token from the headers of a request
    pub fn from_headers(headers: &HeaderMap) -> anyhow::Result<Self> {
        let header_value = headers
            .get(header::AUTHORIZATION)
            .context("Missing authorization in header")?
            .to_str()
            .context("Authorization header is not valid text")?;

        Self::from_bearer(header_value)
    }

    /// Extract the token from a string formatted as 'Bearer <token>'
    pub fn from_bearer(header_value: &str) -> anyhow::Result<Self> {
        let token = header_value
            .strip_prefix(BEARER_AUTH_PREFIX)
            .context("Authorization scheme not bearer")?
            .trim();
        if token.is_empty() {
            anyhow::bail!("Empty bearer token");
        }
        Ok(Self(token.to_string()))
    }

    /// Header value carrying `token`
    pub fn header_value(token: &str) -> String {
        format!("{}{}", BEARER_AUTH_PREFIX, token)
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
