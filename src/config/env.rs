use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use anyhow::{anyhow, Context};

pub(super) fn get_env_mandatory_value<T, E>(key: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = E>,
    E: Error + Send + Sync + 'static
{
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .with_context(|| format!("{key} environment variable must be set"))?
        .parse()
        .map_err(|e: E| anyhow!(e).context(format!("invalid value of the {key} environment variable")))
}

pub(super) fn get_env_value_or_default<T, E>(key: &str, default: T) -> T
where
    T: FromStr<Err = E> + Display,
    E: Error + Send + Sync + 'static
{
    std::env::var(key)
        .map_err(|e| {
            log::warn!("no value was found for an optional environment variable {key}, using the default value {default}");
            anyhow!(e)
        })
        .and_then(|v| v.parse()
            .map_err(|e: E| {
                log::warn!("invalid value of the {key} environment variable, using the default value {default}");
                anyhow!(e)
            }))
        .unwrap_or(default)
}

/// An empty or absent variable means `None`. Unlike [get_env_value_or_default], an unparsable value is an error.
pub(super) fn get_env_optional_value<T, E>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = E>,
    E: Error + Send + Sync + 'static
{
    match std::env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value.parse()
            .map(Some)
            .map_err(|e: E| anyhow!(e).context(format!("invalid value of the {key} environment variable"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow!(e).context(format!("couldn't read the {key} environment variable"))),
    }
}
