use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::Deserialize;

use crate::auth::{AuthGate, Identity, Session};
use crate::error::{RestError, RestResult};

use super::fields::non_empty;

#[derive(Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

#[tracing::instrument(name = "Log in with credentials", skip(gate, body))]
#[post("/login")]
async fn login(
    gate: web::Data<AuthGate>,
    body: web::Json<LoginBody>,
) -> RestResult<impl Responder> {
    let body = body.into_inner();
    let (email, password) = non_empty(body.email)
        .zip(non_empty(body.password))
        .ok_or_else(|| RestError::Validation("email and password are required".into()))?;

    let response = gate.login(&email, &password)?;

    Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(name = "Who am I", skip(session))]
#[get("/me")]
async fn me(session: Session) -> impl Responder {
    let identity: Identity = session.into();
    HttpResponse::Ok().json(identity)
}

/// Auth API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/auth")
        .service(login)
        .service(me)
        .default_service(web::to(super::not_found))
}
