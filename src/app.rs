use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use tracing_actix_web::TracingLogger;

use crate::auth::AuthGate;
use crate::controller::{self, auth, members, subscriptions, workouts};
use crate::error::RestError;
use crate::repo::Store;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Malformed or mistyped JSON bodies are validation errors like any other
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        RestError::Validation(format!("Malformed request body: {}", err)).into()
    })
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, store: Store, gate: AuthGate) -> anyhow::Result<Server> {
    // Wrap application data
    let store = web::Data::new(store);
    let gate = web::Data::new(gate);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(gate.clone())
            .app_data(json_config())
            .service(health_check)
            .service(
                web::scope("/api")
                    .service(auth::scope())
                    .service(members::scope())
                    .service(subscriptions::scope())
                    .service(workouts::scope())
                    .default_service(web::to(controller::not_found)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
