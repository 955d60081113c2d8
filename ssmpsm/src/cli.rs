use clap::{ArgAction, Parser, Subcommand};

use crate::{
    configs::{ClientConfig, loaders},
    domain::{Invocation, InvocationBuilder, Operation, ParameterName},
    error::ParameterError,
    output::OutputFormat,
};

#[derive(Parser, Debug)]
#[command(name = "ssmpsm", version, about = "Get/set AWS SSM parameters", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// AWS region (overrides AWS_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Named AWS profile (overrides AWS_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Custom Parameter Store endpoint, e.g. http://localhost:4566 for LocalStack
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value of a parameter
    Get {
        /// Parameter name, e.g. /app/prod/db_password
        name: String,

        /// Print name, value, type, version and last modified date as JSON
        #[arg(long)]
        json: bool,

        /// Return SecureString values without decrypting them
        #[arg(long)]
        no_decrypt: bool,
    },

    /// Create or overwrite a parameter
    Set {
        /// Parameter name, e.g. /app/prod/db_password
        name: String,

        /// New value
        #[arg(
            required_unless_present = "value_from",
            conflicts_with = "value_from",
            allow_hyphen_values = true
        )]
        value: Option<String>,

        /// Read the value from a URI instead:
        ///
        /// - 'string://<VALUE>'
        ///
        /// - 'file:///path/to/value'
        ///
        /// - 'env://<VARIABLE>'
        ///
        /// - 'aws_secrets://<SECRET_NAME>'
        #[arg(long, value_name = "URI")]
        value_from: Option<String>,

        /// Store the value as an encrypted SecureString
        #[arg(long, short = 's')]
        secure: bool,

        /// Parameter description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// KMS key used to encrypt a SecureString (defaults to the account's SSM key)
        #[arg(long, value_name = "KMS_KEY")]
        key_id: Option<String>,

        /// Print name, version and type as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    pub fn output_format(&self) -> OutputFormat {
        let json = match &self.command {
            Command::Get { json, .. } | Command::Set { json, .. } => *json,
        };
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        }
    }

    /// Default log filter when RUST_LOG is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

impl Command {
    /// Turns parsed arguments into an invocation, resolving `--value-from` first.
    /// Nothing here touches AWS unless the value comes from `aws_secrets://`.
    pub async fn into_invocation(
        self,
        client_config: &ClientConfig,
    ) -> Result<Invocation, ParameterError> {
        let invocation = match self {
            Command::Get {
                name, no_decrypt, ..
            } => InvocationBuilder::new()
                .operation(Operation::Get)
                .name(name)
                .decrypt(!no_decrypt)
                .build()?,
            Command::Set {
                name,
                value,
                value_from,
                secure,
                description,
                key_id,
                ..
            } => {
                ParameterName::parse(name.as_str())?;

                let value = match (value, value_from) {
                    (Some(value), _) => Some(value),
                    (None, Some(uri)) => Some(
                        loaders::load(&uri, client_config)
                            .await
                            .map_err(ParameterError::InvalidInput)?,
                    ),
                    (None, None) => None,
                };

                let mut builder = InvocationBuilder::new()
                    .operation(Operation::Set)
                    .name(name)
                    .secure(secure)
                    .description(description)
                    .key_id(key_id);
                if let Some(value) = value {
                    builder = builder.value(value);
                }
                builder.build()?
            }
        };

        Ok(invocation)
    }
}
