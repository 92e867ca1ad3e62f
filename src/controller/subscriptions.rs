use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::Deserialize;
use serde_json::Value;

use crate::auth::Session;
use crate::error::{RestError, RestResult};
use crate::model::NewSubscription;
use crate::repo::{Store, SubscriptionsRepo};

use super::fields::{non_empty, truthy};

/// JSON body for a new subscription
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriptionBody {
    user_id: Option<String>,
    plan_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    auto_renew: Option<Value>,
}

impl TryFrom<NewSubscriptionBody> for NewSubscription {
    type Error = RestError;

    fn try_from(body: NewSubscriptionBody) -> RestResult<Self> {
        let missing =
            || RestError::Validation("userId, planName, startDate, endDate are required".into());

        Ok(Self {
            user_id: non_empty(body.user_id).ok_or_else(missing)?,
            plan_name: non_empty(body.plan_name).ok_or_else(missing)?,
            start_date: non_empty(body.start_date).ok_or_else(missing)?,
            end_date: non_empty(body.end_date).ok_or_else(missing)?,
            auto_renew: truthy(body.auto_renew.as_ref()),
        })
    }
}

#[tracing::instrument(name = "Create a subscription", skip(_session, store))]
#[post("")]
async fn create(
    _session: Session,
    store: web::Data<Store>,
    body: web::Json<NewSubscriptionBody>,
) -> RestResult<impl Responder> {
    let new_subscription: NewSubscription = body.into_inner().try_into()?;
    let subscription = SubscriptionsRepo::insert(&store, new_subscription)?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(name = "List subscriptions", skip(_session, store))]
#[get("")]
async fn list(_session: Session, store: web::Data<Store>) -> impl Responder {
    HttpResponse::Ok().json(SubscriptionsRepo::fetch_all(&store))
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/subscriptions")
        .service(create)
        .service(list)
        .default_service(web::to(super::not_found))
}
