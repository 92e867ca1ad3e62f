use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use url::Url;

use crate::auth::CredentialRecord;

/// Signing secret shipped in `settings/base.yaml`. Refused in `prod`.
pub const INSECURE_DEFAULT_SECRET: &str = "dev_gym_secret_change_me";

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub store: StoreSettings,
    pub auth: AuthSettings,
    pub client: ClientSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        let path = env::current_dir()?.join("settings");
        // Runtime comes from `APP_ENV`, defaulting to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        let settings: Self = Config::builder()
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Takes the form `APP_<settings category>__<setting name>`
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            // Plain deployment variables win over everything else
            .set_override_option("app.port", env::var("PORT").ok())?
            .set_override_option("app.secret_key", env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")?;

        settings.app.check_secret_key(runtime)?;

        Ok(settings)
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,

    secret_key: Secret<String>,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// The token signing secret
    pub fn secret_key(&self) -> &Secret<String> {
        &self.secret_key
    }

    /// An empty secret is always fatal; the shipped default is fatal in `prod`
    fn check_secret_key(&self, runtime: Runtime) -> anyhow::Result<()> {
        use secrecy::ExposeSecret;

        let secret = self.secret_key.expose_secret();
        if secret.is_empty() {
            anyhow::bail!("app.secret_key must not be empty");
        }
        if secret == INSECURE_DEFAULT_SECRET {
            match runtime {
                Runtime::Prod => anyhow::bail!(
                    "Refusing to start with the default signing secret, set JWT_SECRET"
                ),
                Runtime::Dev => {
                    tracing::warn!("Using the default signing secret, tokens are forgeable")
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct StoreSettings {
    path: PathBuf,
}

impl StoreSettings {
    /// Location of the JSON snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub credentials: Vec<CredentialRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ClientSettings {
    base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    timeout_milliseconds: u64,
}

impl ClientSettings {
    /// Root of the API, e.g. `http://127.0.0.1:3000/api/`
    pub fn base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.base_url).context("Failed to parse client base URL")
    }
    /// Per-request timeout for the API client
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}
