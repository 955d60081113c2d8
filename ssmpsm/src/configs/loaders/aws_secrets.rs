use aws_types::SdkConfig;
use tracing::debug;

/// Reads the string value of a Secrets Manager secret, e.g. to copy it into a parameter.
pub async fn load(sdk_config: &SdkConfig, secret_name: &str) -> Result<String, String> {
    debug!(secret = secret_name, "Loading value from AWS Secrets Manager");
    let client = aws_sdk_secretsmanager::Client::new(sdk_config);

    let result = client
        .get_secret_value()
        .secret_id(secret_name)
        .send()
        .await
        .map_err(|e| format!("Failed to get secret '{secret_name}': {e}"))?;

    result
        .secret_string()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Secret '{secret_name}' has no string value"))
}
