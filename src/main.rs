use std::net::TcpListener;

use anyhow::Context;

use gymdesk::app;
use gymdesk::auth::AuthGate;
use gymdesk::crypto::SigningKey;
use gymdesk::repo::Store;
use gymdesk::settings::Settings;
use gymdesk::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info", std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let store = Store::open(settings.store.path());

    let signing_key = SigningKey::new(settings.app.secret_key())?;
    let gate = AuthGate::new(signing_key, settings.auth.credentials);

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Gym backend API listening on {}", listener.local_addr()?);

    app::run(listener, store, gate)?
        .await
        .context("Failed to run app")
}
