use aws_sdk_ssm::{
    Client,
    config::Builder as SsmConfigBuilder,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::DateTime as SmithyDateTime,
    types::ParameterType as SsmParameterType,
};
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_types::SdkConfig;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    domain::{Parameter, ParameterName, ParameterType, ParameterVersion, PutParameterRequest},
    storage::repository::{ParameterRepository, RepositoryError},
};

/// AWS Systems Manager Parameter Store adapter.
#[derive(Clone)]
pub struct SsmStorage {
    client: Client,
}

impl SsmStorage {
    /// `endpoint_url` overrides the endpoint of the SSM client only.
    pub fn new(sdk_config: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = SsmConfigBuilder::from(sdk_config);
        if let Some(endpoint_url) = endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        Self::with_client(Client::from_conf(builder.build()))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for SsmStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmStorage")
            .field("region", &self.client.config().region())
            .finish()
    }
}

#[async_trait::async_trait]
impl ParameterRepository for SsmStorage {
    async fn get_parameter(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<Parameter, RepositoryError> {
        debug!(
            name = name.as_str(),
            with_decryption, "Fetching parameter from SSM"
        );

        let output = self
            .client
            .get_parameter()
            .name(name.as_str())
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|err| match classify_sdk_error(err) {
                RepositoryError::ParameterNotFound(_) => {
                    RepositoryError::ParameterNotFound(name.to_string())
                }
                other => other,
            })?;

        let parameter = output
            .parameter()
            .ok_or_else(|| RepositoryError::ParameterNotFound(name.to_string()))?;

        let value = parameter.value().ok_or_else(|| {
            RepositoryError::QueryFailed(format!("Parameter '{}' has no value", name))
        })?;

        Ok(Parameter::new(
            name.clone(),
            value,
            from_ssm_type(parameter.r#type()),
            ParameterVersion::new(parameter.version()),
        )
        .with_last_modified(parameter.last_modified_date().and_then(to_chrono)))
    }

    async fn put_parameter(
        &self,
        request: PutParameterRequest,
    ) -> Result<ParameterVersion, RepositoryError> {
        debug!(
            name = request.name.as_str(),
            parameter_type = %request.parameter_type,
            "Writing parameter to SSM"
        );

        let output = self
            .client
            .put_parameter()
            .name(request.name.as_str())
            .value(request.value)
            .r#type(to_ssm_type(request.parameter_type))
            .overwrite(true)
            .set_description(request.description)
            .set_key_id(request.key_id)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(ParameterVersion::new(output.version()))
    }
}

fn from_ssm_type(parameter_type: Option<&SsmParameterType>) -> ParameterType {
    match parameter_type {
        Some(SsmParameterType::SecureString) => ParameterType::SecureString,
        Some(SsmParameterType::StringList) => ParameterType::StringList,
        _ => ParameterType::String,
    }
}

fn to_ssm_type(parameter_type: ParameterType) -> SsmParameterType {
    match parameter_type {
        ParameterType::String => SsmParameterType::String,
        ParameterType::SecureString => SsmParameterType::SecureString,
        ParameterType::StringList => SsmParameterType::StringList,
    }
}

fn to_chrono(timestamp: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

/// Maps an SDK failure onto the repository error kinds.
/// Network level failures are transient; service errors go by their error code,
/// and an unrecognised code on a 5xx response is transient as well.
fn classify_sdk_error<E>(err: SdkError<E, HttpResponse>) -> RepositoryError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();

    match &err {
        SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            RepositoryError::ConnectionFailed(message)
        }
        SdkError::DispatchFailure(failure) if failure.is_io() || failure.is_timeout() => {
            RepositoryError::ConnectionFailed(message)
        }
        // credentials that could not be resolved end up here
        SdkError::DispatchFailure(_) => RepositoryError::AccessDenied(message),
        SdkError::ServiceError(service) => match classify_code(service.err().code(), message) {
            RepositoryError::QueryFailed(message) if service.raw().status().is_server_error() => {
                RepositoryError::Throttled(message)
            }
            classified => classified,
        },
        _ => RepositoryError::QueryFailed(message),
    }
}

fn classify_code(code: Option<&str>, message: String) -> RepositoryError {
    match code {
        Some("ParameterNotFound") | Some("ParameterVersionNotFound") => {
            RepositoryError::ParameterNotFound(message)
        }
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "ExpiredTokenException"
            | "InvalidClientTokenId"
            | "InvalidSignatureException"
            | "KMSAccessDeniedException",
        ) => RepositoryError::AccessDenied(message),
        Some(code) if code.contains("AccessDenied") => RepositoryError::AccessDenied(message),
        Some(
            "ThrottlingException"
            | "TooManyUpdates"
            | "InternalServerError"
            | "ServiceUnavailable"
            | "RequestTimeout",
        ) => RepositoryError::Throttled(message),
        Some(
            "ValidationException"
            | "ParameterPatternMismatchException"
            | "HierarchyLevelLimitExceededException"
            | "HierarchyTypeMismatchException"
            | "ParameterMaxVersionLimitExceeded"
            | "UnsupportedParameterType"
            | "InvalidKeyId"
            | "ParameterLimitExceeded"
            | "ParameterAlreadyExists",
        ) => RepositoryError::ValidationError(message),
        _ => RepositoryError::QueryFailed(message),
    }
}
