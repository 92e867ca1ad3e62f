use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::Deserialize;

use crate::auth::Session;
use crate::error::{RestError, RestResult};
use crate::model::NewWorkout;
use crate::repo::{MembersRepo, Store, WorkoutsRepo};

use super::fields::non_empty;

/// JSON body for a new workout plan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkoutBody {
    month: Option<String>,
    content: Option<String>,
    pdf_url: Option<String>,
}

impl TryFrom<NewWorkoutBody> for NewWorkout {
    type Error = RestError;

    fn try_from(body: NewWorkoutBody) -> RestResult<Self> {
        let (month, content) = non_empty(body.month)
            .zip(non_empty(body.content))
            .ok_or_else(|| RestError::Validation("month and content are required".into()))?;

        Ok(Self {
            month,
            content,
            pdf_url: non_empty(body.pdf_url),
        })
    }
}

#[tracing::instrument(name = "List all workouts", skip(_session, store))]
#[get("")]
async fn list(_session: Session, store: web::Data<Store>) -> impl Responder {
    HttpResponse::Ok().json(WorkoutsRepo::fetch_all(&store))
}

/// Mounted under `/users`
#[tracing::instrument(name = "List workouts for a member", skip(_session, store))]
#[get("/{user_id}/workouts")]
pub(crate) async fn list_for_member(
    _session: Session,
    store: web::Data<Store>,
    path: web::Path<(String,)>,
) -> impl Responder {
    let (user_id,) = path.into_inner();
    HttpResponse::Ok().json(WorkoutsRepo::fetch_for_member(&store, &user_id))
}

/// Mounted under `/users`
#[tracing::instrument(name = "Create a workout for a member", skip(_session, store, body))]
#[post("/{user_id}/workouts")]
pub(crate) async fn create_for_member(
    _session: Session,
    store: web::Data<Store>,
    path: web::Path<(String,)>,
    body: web::Json<NewWorkoutBody>,
) -> RestResult<impl Responder> {
    let (user_id,) = path.into_inner();
    // The member reference is checked before the body fields
    if !MembersRepo::exists(&store, &user_id) {
        return Err(RestError::Validation("Invalid userId".into()));
    }
    let new_workout: NewWorkout = body.into_inner().try_into()?;
    let workout = WorkoutsRepo::insert(&store, &user_id, new_workout)?;

    Ok(HttpResponse::Created().json(workout))
}

/// Workouts API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/workouts")
        .service(list)
        .default_service(web::to(super::not_found))
}
