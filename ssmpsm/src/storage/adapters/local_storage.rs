use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::domain::*;
use crate::storage::repository::*;

/// What an undecrypted `SecureString` reads back as.
pub const MASKED_VALUE: &str = "****";

#[derive(Debug, Clone)]
struct StoredParameter {
    value: String,
    parameter_type: ParameterType,
    version: ParameterVersion,
    description: Option<String>,
}

/// In-memory parameter store. Versions start at 1 and grow by one per write,
/// the same way the remote store numbers them.
#[derive(Clone)]
pub struct LocalStorage {
    parameters: Arc<RwLock<HashMap<ParameterName, StoredParameter>>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self {
            parameters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_parameters(parameters: Vec<(ParameterName, String, ParameterType)>) -> Self {
        let storage = Self::new();
        if let Ok(mut stored) = storage.parameters.write() {
            for (name, value, parameter_type) in parameters {
                stored.insert(
                    name,
                    StoredParameter {
                        value,
                        parameter_type,
                        version: ParameterVersion::first(),
                        description: None,
                    },
                );
            }
        }
        storage
    }

    pub fn description(&self, name: &ParameterName) -> Option<String> {
        self.parameters
            .read()
            .ok()
            .and_then(|stored| stored.get(name).and_then(|p| p.description.clone()))
    }

    pub fn len(&self) -> usize {
        self.parameters.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut stored) = self.parameters.write() {
            stored.clear();
        }
    }

    fn poisoned<T>(_: T) -> RepositoryError {
        RepositoryError::QueryFailed("Local parameter store lock is poisoned".to_string())
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ParameterRepository for LocalStorage {
    async fn get_parameter(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<Parameter, RepositoryError> {
        let stored = self.parameters.read().map_err(Self::poisoned)?;
        let found = stored
            .get(name)
            .ok_or_else(|| RepositoryError::ParameterNotFound(name.to_string()))?;

        let value = if found.parameter_type.is_secure() && !with_decryption {
            MASKED_VALUE.to_string()
        } else {
            found.value.clone()
        };

        Ok(Parameter::new(
            name.clone(),
            value,
            found.parameter_type,
            found.version,
        ))
    }

    async fn put_parameter(
        &self,
        request: PutParameterRequest,
    ) -> Result<ParameterVersion, RepositoryError> {
        let mut stored = self.parameters.write().map_err(Self::poisoned)?;

        let version = stored
            .get(&request.name)
            .map(|existing| existing.version.next())
            .unwrap_or_else(ParameterVersion::first);

        debug!(name = request.name.as_str(), %version, "Storing parameter in memory");

        stored.insert(
            request.name,
            StoredParameter {
                value: request.value,
                parameter_type: request.parameter_type,
                version,
                description: request.description,
            },
        );

        Ok(version)
    }
}
