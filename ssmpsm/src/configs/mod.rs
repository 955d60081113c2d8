pub mod client;
pub mod loaders;
pub mod retry;

pub use client::ClientConfig;
pub use retry::RetryConfig;

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
pub struct SsmpsmConfig {
    pub client_config: ClientConfig,
    pub retry_config: RetryConfig,
}

#[async_trait::async_trait]
impl Configs for SsmpsmConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            client_config: ClientConfig::load().await?,
            retry_config: RetryConfig::load().await?,
        })
    }
}
