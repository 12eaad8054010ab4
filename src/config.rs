use crate::error::{Error, Result};
use crate::llm::{AgentRole, LlmClient, ModelRouter, Provider};
use crate::nutrition::usda::{self, UsdaClient};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub models: Option<ModelsConfig>,
    #[serde(default)]
    pub usda: UsdaConfig,
    #[serde(default)]
    pub handoff: HandoffConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: Provider,
    /// Empty means the provider's default model.
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: String::new(),
            max_tokens: default_max_tokens(),
            api_key_env: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    pub fn resolved_model(&self) -> String {
        if self.model.trim().is_empty() {
            self.provider.default_model().to_string()
        } else {
            self.model.clone()
        }
    }
}

/// Per-agent model configuration for the `[models]` config section.
#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: Provider,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Agent-specific model routing: overrides `[llm]` for one agent.
#[derive(Debug, Deserialize)]
pub struct ModelsConfig {
    pub nutrition: Option<ModelConfig>,
    pub coordinator: Option<ModelConfig>,
}

#[derive(Debug, Deserialize)]
pub struct UsdaConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_usda_key_env")]
    pub api_key_env: String,
    pub base_url: Option<String>,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key_env: default_usda_key_env(),
            base_url: None,
        }
    }
}

impl UsdaConfig {
    pub fn client(&self) -> Result<UsdaClient> {
        UsdaClient::from_env(&self.api_key_env, self.base_url.clone())
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct HandoffConfig {
    /// Defaults to `~/.grocerease/last_plan.json`.
    pub path: Option<PathBuf>,
}

impl HandoffConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(crate::handoff::default_path)
    }
}

// Defaults
fn default_max_tokens() -> u32 {
    2048
}
fn default_usda_key_env() -> String {
    usda::DEFAULT_API_KEY_ENV.into()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// A missing file is not an error; every section has defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            info!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.max_tokens == 0 {
            return Err(Error::config("llm.max_tokens must be greater than 0"));
        }
        if let Some(models) = &self.models {
            for (name, m) in [("nutrition", &models.nutrition), ("coordinator", &models.coordinator)]
            {
                if let Some(m) = m {
                    if m.model.trim().is_empty() {
                        return Err(Error::config(format!("models.{name}.model is empty")));
                    }
                }
            }
        }
        Ok(())
    }

    /// Default client from `[llm]` plus any `[models.*]` overrides.
    pub fn build_router(&self) -> Result<ModelRouter> {
        let default = LlmClient::from_config(
            self.llm.provider,
            self.llm.resolved_model(),
            self.llm.max_tokens,
            self.llm.api_key_env.clone(),
            self.llm.base_url.clone(),
        )?;
        let mut router = ModelRouter::new(default);

        if let Some(models) = &self.models {
            let roles = [
                (AgentRole::Nutrition, &models.nutrition),
                (AgentRole::Coordinator, &models.coordinator),
            ];
            for (role, m) in roles {
                if let Some(m) = m {
                    let client = LlmClient::from_config(
                        m.provider,
                        m.model.clone(),
                        m.max_tokens.unwrap_or(self.llm.max_tokens),
                        m.api_key_env.clone(),
                        m.base_url.clone(),
                    )?;
                    info!(role = ?role, provider = %m.provider, model = %m.model, "model override");
                    router = router.with_client(role, client);
                }
            }
        }
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml = r#"
[llm]
provider = "gemini"
model = "gemini-2.0-flash-001"
max_tokens = 1024

[models]
[models.nutrition]
provider = "anthropic"
model = "claude-3-5-haiku-latest"

[usda]
enabled = true
api_key_env = "MY_USDA_KEY"

[handoff]
path = "/tmp/plan.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.llm.provider, Provider::Gemini);
        assert_eq!(config.llm.max_tokens, 1024);
        let models = config.models.as_ref().unwrap();
        assert!(models.nutrition.is_some());
        assert!(models.coordinator.is_none());
        assert!(config.usda.enabled);
        assert_eq!(config.usda.api_key_env, "MY_USDA_KEY");
        assert_eq!(
            config.handoff.resolved_path(),
            PathBuf::from("/tmp/plan.json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.llm.provider, Provider::Gemini);
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.resolved_model(), "gemini-2.0-flash-001");
        assert!(!config.usda.enabled);
        assert_eq!(config.usda.api_key_env, "USDA_API_KEY");
        assert!(config.models.is_none());
    }

    #[test]
    fn example_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../config.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.models.is_none());
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("grocerease-no-such-config.toml");
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.llm.provider, Provider::Gemini);
    }

    #[test]
    fn validate_rejects_empty_override_model() {
        let config: Config = toml::from_str(
            r#"
[models.coordinator]
model = ""
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn router_applies_overrides() {
        let config: Config = toml::from_str(
            r#"
[llm]
provider = "openai"
model = "base-model"
base_url = "http://localhost:1"

[models.coordinator]
provider = "anthropic"
model = "coord-model"
base_url = "http://localhost:1"
"#,
        )
        .unwrap();
        let router = config.build_router().unwrap();
        assert_eq!(router.client_for(AgentRole::Coordinator).model(), "coord-model");
        assert_eq!(router.client_for(AgentRole::Nutrition).model(), "base-model");
    }
}
