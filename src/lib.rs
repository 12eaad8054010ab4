pub mod agent;
pub mod budget;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handoff;
pub mod http;
pub mod llm;
pub mod money;
pub mod nutrition;
pub mod output;
pub mod request;
pub mod text;

/// CLI override for LLM provider/model.
#[derive(Debug, Clone, Default)]
pub struct LlmOverride {
    pub provider: Option<llm::Provider>,
    pub model: Option<String>,
}

impl LlmOverride {
    pub fn from_flags(
        provider: Option<String>,
        model: Option<String>,
    ) -> error::Result<Option<Self>> {
        if provider.is_none() && model.is_none() {
            return Ok(None);
        }
        let provider = provider
            .map(|p| p.parse::<llm::Provider>())
            .transpose()
            .map_err(error::Error::config)?;
        Ok(Some(Self { provider, model }))
    }

    /// A provider switch without an explicit model falls back to that provider's default.
    pub fn apply(&self, llm: &mut config::LlmConfig) {
        if let Some(provider) = self.provider {
            if provider != llm.provider {
                llm.model.clear();
                llm.api_key_env = None;
                llm.base_url = None;
            }
            llm.provider = provider;
        }
        if let Some(model) = &self.model {
            llm.model = model.clone();
        }
    }
}
