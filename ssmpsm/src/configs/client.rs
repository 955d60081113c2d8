use aws_config::{BehaviorVersion, retry::RetryConfig as SdkRetryConfig};
use aws_types::{SdkConfig, region::Region};
use tracing::debug;

use super::{Configs, loaders::environment::optional_env};

/// Where and as whom to talk to the Parameter Store.
/// Anything left `None` falls through to the SDK's default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientConfig {
    /// Command line flags win over the environment.
    pub fn with_overrides(
        mut self,
        region: Option<String>,
        profile: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        if region.is_some() {
            self.region = region;
        }
        if profile.is_some() {
            self.profile = profile;
        }
        if endpoint_url.is_some() {
            self.endpoint_url = endpoint_url;
        }
        self
    }

    /// Builds the shared SDK configuration. SDK-level retries are turned off,
    /// transient failures are retried by the parameter client instead.
    /// `endpoint_url` is left out: it only applies to the SSM client.
    pub async fn sdk_config(&self) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(SdkRetryConfig::disabled());

        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = self.region.clone() {
            loader = loader.region(Region::new(region));
        }

        debug!(config = ?self, "Loading AWS SDK configuration");
        loader.load().await
    }
}

#[async_trait::async_trait]
impl Configs for ClientConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ClientConfig {
            region: optional_env("AWS_REGION"),
            profile: optional_env("AWS_PROFILE"),
            endpoint_url: optional_env("AWS_ENDPOINT_URL_SSM").or_else(|| optional_env("SSM_ENDPOINT")),
        })
    }
}
