use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 2048;
const MAX_HIERARCHY_LEVELS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterName(String);

impl ParameterName {
    /// Validates a name before it is sent anywhere.
    /// Plain names (`db_password`) and hierarchical ones (`/app/prod/db_password`)
    /// are both accepted; the store has the final word on everything else.
    pub fn parse(name: impl Into<String>) -> Result<Self, InvocationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(InvocationError::MissingName);
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvocationError::InvalidName(format!(
                "'{name}' contains whitespace or control characters"
            )));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(InvocationError::InvalidName(format!(
                "name is longer than {MAX_NAME_LENGTH} characters"
            )));
        }
        let levels = name.split('/').filter(|s| !s.is_empty()).count();
        if levels > MAX_HIERARCHY_LEVELS {
            return Err(InvocationError::InvalidName(format!(
                "'{name}' has {levels} hierarchy levels, at most {MAX_HIERARCHY_LEVELS} are allowed"
            )));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterVersion(i64);

impl ParameterVersion {
    pub fn new(version: i64) -> Self {
        Self(version)
    }

    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParameterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParameterType {
    #[default]
    String,
    SecureString,
    StringList,
}

impl ParameterType {
    pub fn from_secure(secure: bool) -> Self {
        if secure {
            Self::SecureString
        } else {
            Self::String
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, Self::SecureString)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::SecureString => "SecureString",
            Self::StringList => "StringList",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: ParameterName,
    value: String,
    #[serde(rename = "type")]
    parameter_type: ParameterType,
    version: ParameterVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<DateTime<Utc>>,
}

impl Parameter {
    pub fn new(
        name: ParameterName,
        value: impl Into<String>,
        parameter_type: ParameterType,
        version: ParameterVersion,
    ) -> Self {
        Self {
            name,
            value: value.into(),
            parameter_type,
            version,
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    pub fn version(&self) -> ParameterVersion {
        self.version
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

/// Everything a single write sends to the store. Writes always overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct PutParameterRequest {
    pub name: ParameterName,
    pub value: String,
    pub parameter_type: ParameterType,
    pub description: Option<String>,
    pub key_id: Option<String>,
}

impl PutParameterRequest {
    pub fn new(name: ParameterName, value: impl Into<String>, secure: bool) -> Self {
        Self {
            name,
            value: value.into(),
            parameter_type: ParameterType::from_secure(secure),
            description: None,
            key_id: None,
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn key_id(mut self, key_id: Option<String>) -> Self {
        self.key_id = key_id;
        self
    }

    pub fn validate(&self) -> Result<(), InvocationError> {
        if self.value.is_empty() {
            return Err(InvocationError::MissingValue);
        }
        if self.key_id.is_some() && !self.parameter_type.is_secure() {
            return Err(InvocationError::KeyIdWithoutSecure);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// One CLI request, created per process run.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    operation: Operation,
    name: ParameterName,
    value: Option<String>,
    secure: bool,
    decrypt: bool,
    description: Option<String>,
    key_id: Option<String>,
}

impl Invocation {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn decrypt(&self) -> bool {
        self.decrypt
    }

    /// Only meaningful for `set`; `None` for a `get` invocation.
    pub fn into_put_request(self) -> Option<PutParameterRequest> {
        let Self {
            operation,
            name,
            value,
            secure,
            description,
            key_id,
            ..
        } = self;

        match (operation, value) {
            (Operation::Set, Some(value)) => Some(
                PutParameterRequest::new(name, value, secure)
                    .description(description)
                    .key_id(key_id),
            ),
            _ => None,
        }
    }
}

pub struct InvocationBuilder {
    operation: Option<Operation>,
    name: Option<String>,
    value: Option<String>,
    secure: bool,
    decrypt: bool,
    description: Option<String>,
    key_id: Option<String>,
}

impl InvocationBuilder {
    pub fn new() -> Self {
        Self {
            operation: None,
            name: None,
            value: None,
            secure: false,
            decrypt: true,
            description: None,
            key_id: None,
        }
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn decrypt(mut self, decrypt: bool) -> Self {
        self.decrypt = decrypt;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn key_id(mut self, key_id: Option<String>) -> Self {
        self.key_id = key_id;
        self
    }

    pub fn build(self) -> Result<Invocation, InvocationError> {
        let operation = self.operation.ok_or(InvocationError::MissingOperation)?;
        let name = ParameterName::parse(self.name.ok_or(InvocationError::MissingName)?)?;

        if operation == Operation::Set {
            match self.value.as_deref() {
                None | Some("") => return Err(InvocationError::MissingValue),
                Some(_) => {}
            }
            if self.key_id.is_some() && !self.secure {
                return Err(InvocationError::KeyIdWithoutSecure);
            }
        }

        Ok(Invocation {
            operation,
            name,
            value: self.value,
            secure: self.secure,
            decrypt: self.decrypt,
            description: self.description,
            key_id: self.key_id,
        })
    }
}

impl Default for InvocationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    MissingOperation,
    MissingName,
    MissingValue,
    InvalidName(String),
    KeyIdWithoutSecure,
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperation => write!(f, "Operation is required"),
            Self::MissingName => write!(f, "Parameter name is required"),
            Self::MissingValue => write!(f, "A non-empty value is required to set a parameter"),
            Self::InvalidName(reason) => write!(f, "Invalid parameter name: {}", reason),
            Self::KeyIdWithoutSecure => {
                write!(f, "A KMS key id can only be used with --secure")
            }
        }
    }
}

impl std::error::Error for InvocationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hierarchical_name() {
        let name = ParameterName::parse("/app/prod/db_password").unwrap();
        assert_eq!(name.as_str(), "/app/prod/db_password");
    }

    #[test]
    fn test_parse_plain_name() {
        assert!(ParameterName::parse("db_password").is_ok());
    }

    #[test]
    fn test_parse_empty_name() {
        assert_eq!(ParameterName::parse(""), Err(InvocationError::MissingName));
    }

    #[test]
    fn test_parse_name_with_whitespace() {
        let result = ParameterName::parse("/app/my key");
        assert!(matches!(result, Err(InvocationError::InvalidName(_))));
    }

    #[test]
    fn test_parse_name_too_deep() {
        let deep = (0..16).map(|i| format!("/l{i}")).collect::<String>();
        assert!(matches!(
            ParameterName::parse(deep),
            Err(InvocationError::InvalidName(_))
        ));

        let fifteen = (0..15).map(|i| format!("/l{i}")).collect::<String>();
        assert!(ParameterName::parse(fifteen).is_ok());
    }

    #[test]
    fn test_parse_name_too_long() {
        let long = format!("/{}", "a".repeat(MAX_NAME_LENGTH));
        assert!(matches!(
            ParameterName::parse(long),
            Err(InvocationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_version_next() {
        assert_eq!(ParameterVersion::first().next(), ParameterVersion::new(2));
    }

    #[test]
    fn test_parameter_type_from_secure() {
        assert_eq!(ParameterType::from_secure(true), ParameterType::SecureString);
        assert_eq!(ParameterType::from_secure(false), ParameterType::String);
        assert_eq!(ParameterType::SecureString.to_string(), "SecureString");
    }

    #[test]
    fn test_build_get_invocation() {
        let invocation = InvocationBuilder::new()
            .operation(Operation::Get)
            .name("/app/key")
            .build()
            .unwrap();

        assert_eq!(invocation.operation(), Operation::Get);
        assert!(invocation.decrypt());
        assert!(invocation.into_put_request().is_none());
    }

    #[test]
    fn test_build_set_invocation_requires_value() {
        let missing = InvocationBuilder::new()
            .operation(Operation::Set)
            .name("/app/key")
            .build();
        assert_eq!(missing, Err(InvocationError::MissingValue));

        let empty = InvocationBuilder::new()
            .operation(Operation::Set)
            .name("/app/key")
            .value("")
            .build();
        assert_eq!(empty, Err(InvocationError::MissingValue));
    }

    #[test]
    fn test_build_missing_operation() {
        let result = InvocationBuilder::new().name("/app/key").build();
        assert_eq!(result, Err(InvocationError::MissingOperation));
    }

    #[test]
    fn test_key_id_requires_secure() {
        let result = InvocationBuilder::new()
            .operation(Operation::Set)
            .name("/app/key")
            .value("v")
            .key_id(Some("alias/app".to_string()))
            .build();
        assert_eq!(result, Err(InvocationError::KeyIdWithoutSecure));
    }

    #[test]
    fn test_set_invocation_into_put_request() {
        let request = InvocationBuilder::new()
            .operation(Operation::Set)
            .name("/app/key")
            .value("v")
            .secure(true)
            .description(Some("app key".to_string()))
            .build()
            .unwrap()
            .into_put_request()
            .unwrap();

        assert_eq!(request.name.as_str(), "/app/key");
        assert_eq!(request.value, "v");
        assert_eq!(request.parameter_type, ParameterType::SecureString);
        assert_eq!(request.description.as_deref(), Some("app key"));
    }

    #[test]
    fn test_parameter_serializes_type_field() {
        let parameter = Parameter::new(
            ParameterName::parse("/app/key").unwrap(),
            "v",
            ParameterType::String,
            ParameterVersion::new(4),
        );
        let value = serde_json::to_value(&parameter).unwrap();

        assert_eq!(value["type"], "String");
        assert_eq!(value["version"], 4);
        assert!(value.get("last_modified").is_none());
    }
}
