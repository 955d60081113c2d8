use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing::debug;

use crate::{
    cli::Args,
    client::ParameterClient,
    configs::{Configs, SsmpsmConfig},
    domain::{Invocation, Operation, Parameter, ParameterName, ParameterType, ParameterVersion},
    error::ParameterError,
    output::Output,
    storage::{adapters::ssm_storage::SsmStorage, repository::ParameterRepository},
};

/// Result of a completed invocation, ready to be printed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Fetched(Parameter),
    Written {
        name: ParameterName,
        version: ParameterVersion,
        parameter_type: ParameterType,
    },
}

/// Runs one invocation against whatever store the client wraps.
pub async fn execute<R>(
    client: &ParameterClient<R>,
    invocation: Invocation,
) -> Result<Outcome, ParameterError>
where
    R: ParameterRepository + ?Sized,
{
    match invocation.operation() {
        Operation::Get => {
            let parameter = client
                .fetch(invocation.name(), invocation.decrypt())
                .await?;
            Ok(Outcome::Fetched(parameter))
        }
        Operation::Set => {
            let request = invocation
                .into_put_request()
                .ok_or(ParameterError::InvalidInput(
                    "A non-empty value is required to set a parameter".to_string(),
                ))?;
            let name = request.name.clone();
            let parameter_type = request.parameter_type;
            let version = client.put(request).await?;

            Ok(Outcome::Written {
                name,
                version,
                parameter_type,
            })
        }
    }
}

pub fn print_outcome(output: &Output, outcome: &Outcome) -> Result<(), ParameterError> {
    let printed = match outcome {
        Outcome::Fetched(parameter) => output.print_parameter(parameter),
        Outcome::Written {
            name,
            version,
            parameter_type,
        } => output.print_written(name, *version, *parameter_type),
    };

    printed.map_err(|e| ParameterError::Service(format!("Failed to write output: {e}")))
}

async fn load_config() -> anyhow::Result<SsmpsmConfig> {
    SsmpsmConfig::load()
        .await
        .map_err(|e| anyhow!(e.to_string()))
        .context("Failed to load configuration")
}

/// Full CLI flow: configuration, input validation, SDK setup, the remote call,
/// and printing. The AWS configuration is only loaded once the input is valid.
pub async fn run(args: Args, output: &Output) -> Result<(), ParameterError> {
    let config = load_config()
        .await
        .map_err(|e| ParameterError::InvalidInput(format!("{e:#}")))?;

    let client_config = config.client_config.with_overrides(
        args.region,
        args.profile,
        args.endpoint_url,
    );

    let invocation = args.command.into_invocation(&client_config).await?;
    debug!(
        operation = %invocation.operation(),
        name = invocation.name().as_str(),
        "Running invocation"
    );

    let sdk_config = client_config.sdk_config().await;
    let repository: Arc<dyn ParameterRepository> = Arc::new(SsmStorage::new(
        &sdk_config,
        client_config.endpoint_url.as_deref(),
    ));
    let client = ParameterClient::new(repository, config.retry_config);

    let outcome = execute(&client, invocation).await?;
    print_outcome(output, &outcome)
}
