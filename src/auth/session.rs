use std::future::{ready, Ready};

use actix_web::{dev, web, FromRequest, HttpRequest};

use crate::error::{RestError, RestResult};

use super::{AuthGate, Identity};

/// Authenticated session guard: handlers taking a `Session` reject requests
/// without a valid bearer token
#[derive(Debug, Clone)]
pub struct Session(Identity);

impl Session {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl From<Session> for Identity {
    fn from(session: Session) -> Identity {
        session.0
    }
}

impl FromRequest for Session {
    type Error = RestError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> RestResult<Session> {
    // NOTE: Must be registered with the application at startup
    let gate = req
        .app_data::<web::Data<AuthGate>>()
        .ok_or_else(|| RestError::InternalError("AuthGate not registered for application".into()))?;

    let identity = gate.authenticate(req.headers())?;

    Ok(Session(identity))
}
