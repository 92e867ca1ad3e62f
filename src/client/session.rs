use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use async_trait::async_trait;

use crate::auth::Identity;

/// Storage key of the session token
pub const TOKEN_KEY: &str = "gym_token";
/// Storage key of the serialized signed-in identity
pub const USER_KEY: &str = "gym_user";

/// Durable string key/value storage for the client session
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Process-lifetime session storage
#[derive(Debug, Default)]
pub struct MemorySessionStore(Mutex<HashMap<String, String>>);

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

impl MemorySessionStore {
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Session storage kept in a JSON object on disk, surviving restarts
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> anyhow::Result<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).context("Failed to parse session file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e).context("Failed to read session file"),
        }
    }

    async fn write(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create session directory")?;
        }
        let payload = serde_json::to_vec(entries).context("Failed to serialize session")?;
        tokio::fs::write(&self.path, payload)
            .await
            .context("Failed to write session file")
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        if entries.remove(key).is_some() {
            self.write(&entries).await?;
        }
        Ok(())
    }
}

/// The signed-in session of the client: token plus identity
#[derive(Debug)]
pub struct SessionClient<S> {
    store: S,
}

impl<S: SessionStore> SessionClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> anyhow::Result<Option<String>> {
        Ok(self.store.get(TOKEN_KEY).await?.filter(|t| !t.is_empty()))
    }

    pub async fn set_token(&self, token: &str) -> anyhow::Result<()> {
        self.store.set(TOKEN_KEY, token).await
    }

    /// The stored identity; unreadable entries count as signed out
    pub async fn user(&self) -> anyhow::Result<Option<Identity>> {
        let raw = match self.store.get(USER_KEY).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored user");
                Ok(None)
            }
        }
    }

    pub async fn set_user(&self, user: &Identity) -> anyhow::Result<()> {
        let raw = serde_json::to_string(user).context("Failed to serialize user")?;
        self.store.set(USER_KEY, &raw).await
    }

    pub async fn is_authenticated(&self) -> anyhow::Result<bool> {
        Ok(self.token().await?.is_some())
    }

    /// Drop both the token and the identity
    pub async fn logout(&self) -> anyhow::Result<()> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await
    }
}
