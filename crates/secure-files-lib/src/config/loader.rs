use super::Settings;
use crate::error::SecureFilesError;
use config::Config as ConfigBuilder;

/// Variable name to value, as read from an environment.
pub type EnvVars = config::Map<String, String>;

/// Reads settings from the process environment, after loading `.env` if one exists.
pub fn load_settings() -> Result<Settings, SecureFilesError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    build_settings(config::Environment::default().ignore_empty(true))
}

/// Reads settings from an explicit variable map instead of the process environment.
pub fn load_settings_from(vars: EnvVars) -> Result<Settings, SecureFilesError> {
    build_settings(
        config::Environment::default()
            .ignore_empty(true)
            .source(Some(vars)),
    )
}

fn build_settings(environment: config::Environment) -> Result<Settings, SecureFilesError> {
    let config_builder = ConfigBuilder::builder().add_source(environment).build()?;

    config_builder.try_deserialize().map_err(Into::into)
}
