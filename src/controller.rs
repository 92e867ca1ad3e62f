/// Login and identity endpoints
pub mod auth;
/// Member CRUD endpoints
pub mod members;
/// Subscription endpoints
pub mod subscriptions;
/// Workout plan endpoints
pub mod workouts;

mod fields;

use crate::auth::Session;
use crate::error::{RestError, RestResult};

/// Unmatched paths and methods under `/api`: authentication still comes first.
/// Registered as the default service of `/api` and of every nested scope, since
/// actix scopes do not inherit their parent's default.
pub(crate) async fn not_found(_session: Session) -> RestResult<actix_web::HttpResponse> {
    Err(RestError::NotFound("Not found".into()))
}
