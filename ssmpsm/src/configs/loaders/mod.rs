pub mod aws_secrets;
pub mod environment;
pub mod file;
pub mod string;

use crate::configs::ClientConfig;

/// Resolves a `--value-from` URI into the value to store.
/// Unknown schemes are taken literally. Only `aws_secrets://` loads AWS configuration.
pub async fn load(input: &str, client_config: &ClientConfig) -> Result<String, String> {
    if let Some(content) = input.strip_prefix("string://") {
        string::load(content)
    } else if let Some(path) = input.strip_prefix("file://") {
        file::load(path)
    } else if let Some(env_name) = input.strip_prefix("env://") {
        environment::load(env_name)
    } else if let Some(secret_name) = input.strip_prefix("aws_secrets://") {
        let sdk_config = client_config.sdk_config().await;
        aws_secrets::load(&sdk_config, secret_name).await
    } else {
        string::load(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::NamedTempFile;

    fn client_config() -> ClientConfig {
        ClientConfig::default()
    }

    #[tokio::test]
    async fn test_load_string_uri() {
        let result = load("string://test content", &client_config()).await.unwrap();
        assert_eq!(result, "test content");
    }

    #[tokio::test]
    async fn test_load_file_uri() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, "file content\n").unwrap();

        let uri = format!("file://{}", temp_file.path().to_str().unwrap());
        let result = load(&uri, &client_config()).await.unwrap();
        assert_eq!(result, "file content");
    }

    #[tokio::test]
    #[serial]
    async fn test_load_env_uri() {
        unsafe {
            std::env::set_var("SSMPSM_LOADER_VALUE", "from env");
        }

        let result = load("env://SSMPSM_LOADER_VALUE", &client_config()).await.unwrap();
        assert_eq!(result, "from env");

        unsafe {
            std::env::remove_var("SSMPSM_LOADER_VALUE");
        }
    }

    #[tokio::test]
    async fn test_load_unknown_scheme_is_literal() {
        let result = load("https://example.com", &client_config()).await.unwrap();
        assert_eq!(result, "https://example.com");
    }
}
