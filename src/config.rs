//! Process-wide configuration for the refinement service.
//!
//! Built once at startup and passed explicitly into the [`crate::Refiner`];
//! nothing reads it as ambient state. Precedence: CLI overrides, then the
//! provider's environment variable, then the optional TOML file at
//! `<config dir>/historico-rural/config.toml`.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::refine::llm_client::Provider;
use crate::refine::prompts::{REFINE_MAX_TOKENS, REFINE_TEMPERATURE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "API key não configurada para o provedor {provider}! Defina a variável {env_var} ou \
         adicione api_key ao config.toml"
    )]
    MissingApiKey { provider: String, env_var: String },
    #[error("{0}")]
    UnknownProvider(String),
    #[error("falha ao ler o arquivo de configuração {}: {}", .path.display(), .source)]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("arquivo de configuração inválido {}: {}", .path.display(), .source)]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Values the CLI may override on a single invocation.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

/// Optional on-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved configuration handed to the refinement service.
#[derive(Debug, Clone)]
pub struct RefineConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl RefineConfig {
    /// Loads and resolves the configuration, halting with a visible error
    /// when the chosen provider requires a credential and none is found.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match default_config_path() {
            Some(path) if path.exists() => FileConfig::read(&path)?,
            _ => FileConfig::default(),
        };
        resolve(overrides, file, |var| {
            env::var(var).ok().filter(|v| !v.trim().is_empty())
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("historico-rural").join("config.toml"))
}

fn resolve(
    overrides: &ConfigOverrides,
    file: FileConfig,
    env_key: impl Fn(&str) -> Option<String>,
) -> Result<RefineConfig, ConfigError> {
    let provider_name = overrides
        .provider
        .clone()
        .or(file.provider)
        .unwrap_or_else(|| "openai".to_string());
    let provider: Provider = provider_name
        .parse()
        .map_err(ConfigError::UnknownProvider)?;

    let model = overrides
        .model
        .clone()
        .or(file.model)
        .unwrap_or_else(|| provider.default_model().to_string());
    let endpoint = overrides.endpoint.clone().or(file.endpoint);

    let api_key = provider
        .api_key_env()
        .and_then(&env_key)
        .or(file.api_key)
        .filter(|key| !key.trim().is_empty());

    if provider.requires_api_key() && api_key.is_none() {
        return Err(ConfigError::MissingApiKey {
            provider: provider.to_string(),
            env_var: provider.api_key_env().unwrap_or_default().to_string(),
        });
    }

    Ok(RefineConfig {
        provider,
        model,
        api_key,
        endpoint,
        max_tokens: REFINE_MAX_TOKENS,
        temperature: REFINE_TEMPERATURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_to_openai_with_env_credential() {
        let config = resolve(&ConfigOverrides::default(), FileConfig::default(), |var| {
            (var == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();

        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_missing_credential_halts_configuration() {
        let err = resolve(&ConfigOverrides::default(), FileConfig::default(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_ollama_needs_no_credential() {
        let overrides = ConfigOverrides {
            provider: Some("ollama".to_string()),
            ..Default::default()
        };
        let config = resolve(&overrides, FileConfig::default(), no_env).unwrap();
        assert_eq!(config.provider, Provider::Ollama);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let overrides = ConfigOverrides {
            provider: Some("copilot".to_string()),
            ..Default::default()
        };
        let err = resolve(&overrides, FileConfig::default(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(_)));
    }

    #[test]
    fn test_cli_override_beats_file_value() {
        let overrides = ConfigOverrides {
            provider: Some("ollama".to_string()),
            model: Some("qwen2.5".to_string()),
            ..Default::default()
        };
        let file = FileConfig {
            provider: Some("claude".to_string()),
            model: Some("claude-3-5-haiku-latest".to_string()),
            ..Default::default()
        };
        let config = resolve(&overrides, file, no_env).unwrap();
        assert_eq!(config.provider, Provider::Ollama);
        assert_eq!(config.model, "qwen2.5");
    }

    #[test]
    fn test_file_credential_is_used_when_env_is_absent() {
        let file = FileConfig {
            api_key: Some("sk-from-file".to_string()),
            ..Default::default()
        };
        let config = resolve(&ConfigOverrides::default(), file, no_env).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let file = FileConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let err = resolve(&ConfigOverrides::default(), file, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }
}
