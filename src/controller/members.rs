use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use serde::Deserialize;
use serde_json::Value;

use crate::auth::Session;
use crate::error::{RestError, RestResult};
use crate::model::{MemberChanges, NewMember};
use crate::repo::{MembersRepo, Store};

use super::fields::{non_empty, present, truthy};
use super::workouts;

/// JSON body for a new member
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemberBody {
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    whatsapp_opt_in: Option<Value>,
}

impl TryFrom<NewMemberBody> for NewMember {
    type Error = RestError;

    fn try_from(body: NewMemberBody) -> RestResult<Self> {
        let (name, phone) = non_empty(body.name)
            .zip(non_empty(body.phone))
            .ok_or_else(|| RestError::Validation("name and phone are required".into()))?;

        Ok(Self {
            name,
            phone,
            email: non_empty(body.email),
            whatsapp_opt_in: truthy(body.whatsapp_opt_in.as_ref()),
        })
    }
}

/// JSON body for a partial member update, absent keys are left alone
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberChangesBody {
    name: Option<String>,
    phone: Option<String>,
    #[serde(default, deserialize_with = "crate::model::deserialize_present")]
    email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    whatsapp_opt_in: Option<Value>,
}

impl From<MemberChangesBody> for MemberChanges {
    fn from(body: MemberChangesBody) -> Self {
        Self {
            name: body.name,
            phone: body.phone,
            email: body.email,
            whatsapp_opt_in: body.whatsapp_opt_in.as_ref().map(|v| truthy(Some(v))),
        }
    }
}

#[tracing::instrument(name = "List members", skip(_session, store))]
#[get("")]
async fn list(_session: Session, store: web::Data<Store>) -> impl Responder {
    HttpResponse::Ok().json(MembersRepo::fetch_all(&store))
}

#[tracing::instrument(name = "Get a member", skip(_session, store))]
#[get("/{id}")]
async fn fetch(
    _session: Session,
    store: web::Data<Store>,
    path: web::Path<(String,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    let member = MembersRepo::fetch_by_id(&store, &id)?;

    Ok(HttpResponse::Ok().json(member))
}

#[tracing::instrument(name = "Create a member", skip(_session, store))]
#[post("")]
async fn create(
    _session: Session,
    store: web::Data<Store>,
    body: web::Json<NewMemberBody>,
) -> RestResult<impl Responder> {
    let new_member: NewMember = body.into_inner().try_into()?;
    let member = MembersRepo::insert(&store, new_member)?;

    Ok(HttpResponse::Created().json(member))
}

#[tracing::instrument(name = "Update a member", skip(_session, store))]
#[put("/{id}")]
async fn update(
    _session: Session,
    store: web::Data<Store>,
    path: web::Path<(String,)>,
    body: web::Json<MemberChangesBody>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    let member = MembersRepo::update(&store, &id, body.into_inner().into())?;

    Ok(HttpResponse::Ok().json(member))
}

#[tracing::instrument(name = "Delete a member", skip(_session, store))]
#[delete("/{id}")]
async fn remove(
    _session: Session,
    store: web::Data<Store>,
    path: web::Path<(String,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    MembersRepo::delete(&store, &id)?;

    Ok(HttpResponse::NoContent().finish())
}

/// Member API endpoints, including the per-member workout routes
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/users")
        .service(list)
        .service(create)
        .service(fetch)
        .service(update)
        .service(remove)
        .service(workouts::list_for_member)
        .service(workouts::create_for_member)
        .default_service(web::to(super::not_found))
}
