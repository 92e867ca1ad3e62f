use chrono::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::Role;

use super::{SigningKey, Token, TokenResult};

/// Identity carried inside a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl SessionClaims {
    pub fn sign(&self, key: &SigningKey, lifetime: Duration) -> TokenResult<Token> {
        Token::builder(self).expires_in(lifetime).sign(key.as_ref())
    }

    pub fn verify(key: &SigningKey, token: &str) -> TokenResult<Self> {
        token.parse::<Token>()?.verify(key.as_ref())
    }
}
