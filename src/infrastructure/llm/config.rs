//! LLM Configuration

use serde::{Deserialize, Serialize};

use super::ChatOptions;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Persona of the site assistant
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Tu es Zetsu AI, un assistant expert en cybersécurité intégré au site web de téléchargement du logiciel Zetsu.
Ton rôle est d'aider les utilisateurs à comprendre les menaces informatiques, à expliquer pourquoi Zetsu est utile, et à donner des conseils de sécurité.
Sois concis, professionnel, rassurant et utilise un ton légèrement technologique/futuriste.
Si on te demande de générer du code malveillant, refuse poliment et explique les risques.
Tu parles principalement français.

Fonctionnalités de Zetsu à mettre en avant si pertinent :
- Protection en temps réel (Real-time Shield)
- VPN intégré sans logs
- Analyse heuristique par IA
- Coffre-fort de mots de passe
- Pare-feu bidirectionnel
";

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    pub api_key: Option<String>,
    /// Override for the provider API root
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

impl LLMConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables where set
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api_key = Some(key);
        } else if let Ok(key) = std::env::var("API_KEY") {
            if self.api_key.is_none() {
                self.api_key = Some(key);
            }
        }

        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.model = model;
        }

        if let Ok(prompt) = std::env::var("LLM_SYSTEM_PROMPT") {
            self.system_prompt = Some(prompt);
        }

        if let Ok(temp) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = temp.parse() {
                self.temperature = t;
            }
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Session settings handed to the provider
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_instruction: self.system_prompt.clone(),
        }
    }
}
