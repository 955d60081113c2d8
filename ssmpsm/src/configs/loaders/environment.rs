use std::{env, str::FromStr};

pub fn required_env(env_name: &str) -> Result<String, String> {
    env::var(env_name).map_err(|_| format!("Required environment variable '{env_name}' is not set"))
}

pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|v| !v.is_empty())
}

/// Reads and parses a variable, falling back to `default` when it is unset.
/// A set-but-unparsable value is an error rather than a silent default.
pub fn parse_env_or<T>(env_name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(env_name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("Environment variable '{env_name}' has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

/// `env://VAR` loader: the value of a variable that must be set.
pub fn load(env_name: &str) -> Result<String, String> {
    required_env(env_name)
}
