use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    configs::RetryConfig,
    domain::{Parameter, ParameterName, ParameterVersion, PutParameterRequest},
    error::ParameterError,
    storage::repository::{ParameterRepository, RepositoryError},
};

/// Reads and writes parameters, validating input up front and retrying
/// transient store failures with exponential backoff.
pub struct ParameterClient<R>
where
    R: ParameterRepository + ?Sized,
{
    repository: Arc<R>,
    retry: RetryConfig,
}

impl<R> ParameterClient<R>
where
    R: ParameterRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, retry: RetryConfig) -> Self {
        Self { repository, retry }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Returns the decrypted value of `name`.
    pub async fn get(&self, name: &str) -> Result<String, ParameterError> {
        Ok(self.get_parameter(name, true).await?.into_value())
    }

    pub async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Parameter, ParameterError> {
        let name = ParameterName::parse(name)?;
        self.fetch(&name, with_decryption).await
    }

    pub async fn fetch(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<Parameter, ParameterError> {
        self.with_retry("get", name, move || {
            self.repository.get_parameter(name, with_decryption)
        })
        .await
    }

    /// Creates or overwrites `name` and returns the new version.
    pub async fn set(
        &self,
        name: &str,
        value: &str,
        secure: bool,
    ) -> Result<ParameterVersion, ParameterError> {
        let name = ParameterName::parse(name)?;
        self.put(PutParameterRequest::new(name, value, secure)).await
    }

    pub async fn put(
        &self,
        request: PutParameterRequest,
    ) -> Result<ParameterVersion, ParameterError> {
        request.validate()?;

        let name = request.name.clone();
        let version = self
            .with_retry("set", &name, move || {
                self.repository.put_parameter(request.clone())
            })
            .await?;

        info!(name = name.as_str(), %version, "Parameter written");
        Ok(version)
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &str,
        name: &ParameterName,
        mut call: F,
    ) -> Result<T, ParameterError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(operation, name = name.as_str(), attempt, "Calling parameter store");

            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        operation,
                        name = name.as_str(),
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::adapters::local_storage::LocalStorage;

    fn client() -> ParameterClient<LocalStorage> {
        ParameterClient::new(Arc::new(LocalStorage::new()), RetryConfig::no_retry())
    }

    #[tokio::test]
    async fn test_round_trip() {
        let client = client();

        let version = client.set("/app/key", "v", false).await.unwrap();
        assert_eq!(version, ParameterVersion::first());
        assert_eq!(client.get("/app/key").await.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_get_never_written() {
        let result = client().get("/app/missing").await;
        assert_eq!(
            result,
            Err(ParameterError::NotFound("/app/missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_set_empty_value_rejected_before_store() {
        let client = client();

        let result = client.set("/app/key", "", false).await;
        assert!(matches!(result, Err(ParameterError::InvalidInput(_))));
        assert!(client.repository().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let client = client();
        assert!(matches!(
            client.get("").await,
            Err(ParameterError::InvalidInput(_))
        ));
        assert!(matches!(
            client.set("", "v", false).await,
            Err(ParameterError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_secure_set_and_raw_get() {
        let client = client();
        client.set("/app/secret", "hunter2", true).await.unwrap();

        let raw = client.get_parameter("/app/secret", false).await.unwrap();
        assert_ne!(raw.value(), "hunter2");
        assert_eq!(client.get("/app/secret").await.unwrap(), "hunter2");
    }
}
