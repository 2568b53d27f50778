use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use log::{ debug, info };
use std::sync::Arc;
use tokio::sync::OnceCell;
use crate::error::SecretError;

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the decrypted value of a parameter.
    async fn get_secret(&self, name: &str) -> Result<String, SecretError>;
}

/// Reads SecureString parameters from SSM Parameter Store.
pub struct SsmSecretStore {
    client: SsmClient,
}

impl SsmSecretStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        let output = self.client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| SecretError::Fetch {
                name: name.to_string(),
                message: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| SecretError::Empty(name.to_string()))
    }
}

/// Serves a key supplied through configuration instead of a parameter store.
pub struct StaticSecretStore {
    value: String,
}

impl StaticSecretStore {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        if self.value.is_empty() {
            return Err(SecretError::Empty(name.to_string()));
        }
        Ok(self.value.clone())
    }
}

/// API key resolved on first use and kept for the life of the process.
/// A failed fetch leaves the cache empty so a later request can try again.
pub struct ApiKeyCache {
    store: Arc<dyn SecretStore>,
    parameter_name: String,
    key: OnceCell<String>,
}

impl ApiKeyCache {
    pub fn new(store: Arc<dyn SecretStore>, parameter_name: impl Into<String>) -> Self {
        Self {
            store,
            parameter_name: parameter_name.into(),
            key: OnceCell::new(),
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    #[cfg(test)]
    pub fn is_resolved(&self) -> bool {
        self.key.initialized()
    }

    pub async fn get(&self) -> Result<&str, SecretError> {
        if let Some(key) = self.key.get() {
            debug!("Using cached API key");
            return Ok(key.as_str());
        }

        let key = self.key.get_or_try_init(|| async {
            info!("Fetching API key from parameter {}", self.parameter_name);
            self.store.get_secret(&self.parameter_name).await
        }).await?;
        Ok(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    struct CountingStore {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl SecretStore for CountingStore {
        async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(SecretError::Fetch { name: name.to_string(), message: "denied".into() });
            }
            Ok(format!("key-for-{}", name))
        }
    }

    #[tokio::test]
    async fn fetches_the_parameter_once() {
        let store = Arc::new(CountingStore { calls: AtomicUsize::new(0), fail_first: false });
        let cache = ApiKeyCache::new(store.clone(), "/prod/anthropic-api-key");

        assert!(!cache.is_resolved());
        assert_eq!(cache.get().await.unwrap(), "key-for-/prod/anthropic-api-key");
        assert_eq!(cache.get().await.unwrap(), "key-for-/prod/anthropic-api-key");
        assert!(cache.is_resolved());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let store = Arc::new(CountingStore { calls: AtomicUsize::new(0), fail_first: true });
        let cache = ApiKeyCache::new(store.clone(), "param");

        assert!(cache.get().await.is_err());
        assert!(!cache.is_resolved());
        assert_eq!(cache.get().await.unwrap(), "key-for-param");
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_static_key_is_an_error() {
        let store = StaticSecretStore::new("");
        assert!(matches!(store.get_secret("p").await, Err(SecretError::Empty(_))));
    }
}
