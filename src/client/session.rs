use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::accounts::dto::AccountResponse;

/// Fixed storage key for the serialized session blob.
pub const SESSION_KEY: &str = "user";

/// Durable key-value storage as provided by the client platform.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// File-per-key backend: `<dir>/<key>.json`.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SessionBackend for FileBackend {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// Older builds persisted the whole login response instead of the account.
#[derive(Deserialize)]
struct StoredEnvelope {
    user: AccountResponse,
}

fn parse_session_blob(raw: &str) -> Option<AccountResponse> {
    if let Ok(account) = serde_json::from_str::<AccountResponse>(raw) {
        return Some(account);
    }
    serde_json::from_str::<StoredEnvelope>(raw)
        .ok()
        .map(|envelope| envelope.user)
}

/// Single-slot cache of the authenticated account, persisted across process
/// restarts. Passed explicitly to whatever observes it; there is no ambient
/// global. Consumers must treat `is_loading() == true` as "unknown state".
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    account: Option<AccountResponse>,
    loading: bool,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            backend,
            account: None,
            loading: true,
        }
    }

    /// Hydrate from durable storage, once, at process start. Corruption and
    /// read failures degrade to "no session"; `loading` flips to `false`
    /// exactly once no matter what.
    pub async fn load(&mut self) {
        if !self.loading {
            return;
        }
        match self.backend.get(SESSION_KEY).await {
            Ok(Some(raw)) => match parse_session_blob(&raw) {
                Some(account) => self.account = Some(account),
                None => warn!("stored session is malformed; starting signed out"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read stored session; starting signed out"),
        }
        self.loading = false;
    }

    /// Persist the authenticated account and update the in-memory slot.
    pub async fn login(&mut self, account: AccountResponse) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&account)?;
        self.backend.set(SESSION_KEY, &raw).await?;
        self.account = Some(account);
        Ok(())
    }

    /// Clear durable storage and memory. Safe to call when already signed
    /// out.
    pub async fn logout(&mut self) -> anyhow::Result<()> {
        // Memory clears even if the backend write fails.
        self.account = None;
        self.backend.remove(SESSION_KEY).await
    }

    /// Overwrite the cached account after a successful profile update,
    /// without a service round trip.
    pub async fn update_cached(&mut self, account: AccountResponse) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&account)?;
        self.backend.set(SESSION_KEY, &raw).await?;
        self.account = Some(account);
        Ok(())
    }

    pub fn account(&self) -> Option<&AccountResponse> {
        self.account.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
