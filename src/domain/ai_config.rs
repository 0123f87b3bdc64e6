//! Per-widget AI configuration supplied by the caller

use serde::{Deserialize, Serialize};

/// System-role preset for the generation prompt.
///
/// An unrecognized value deserializes to `Support`; `Custom` uses the
/// caller-supplied prompt text verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RolePreset {
    #[default]
    Support,
    Sales,
    Booking,
    Technical,
    General,
    Custom,
}

impl<'de> Deserialize<'de> for RolePreset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

impl RolePreset {
    /// Resolve a preset by name; anything unrecognized is treated as support.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "sales" => Self::Sales,
            "booking" => Self::Booking,
            "technical" => Self::Technical,
            "general" => Self::General,
            "custom" => Self::Custom,
            _ => Self::Support,
        }
    }

    pub fn preset_text(&self) -> &'static str {
        match self {
            Self::Support | Self::Custom => {
                "You are a helpful customer support assistant. Your role is to assist customers \
                 with their questions, resolve issues, and provide excellent service. Be friendly, \
                 patient, and professional."
            }
            Self::Sales => {
                "You are a sales assistant focused on helping customers find the right products \
                 or services. Highlight benefits, answer product questions, and guide customers \
                 toward making a purchase. Be enthusiastic and informative."
            }
            Self::Booking => {
                "You are a booking and scheduling assistant. Help customers book appointments, \
                 check availability, and manage reservations. Be organized, clear about timing, \
                 and confirm all details."
            }
            Self::Technical => {
                "You are a technical support specialist. Help customers troubleshoot technical \
                 issues, provide step-by-step solutions, and explain technical concepts clearly. \
                 Be precise and patient."
            }
            Self::General => {
                "You are a versatile AI assistant ready to help with any customer inquiry. Adapt \
                 your tone and approach based on the customer's needs. Be helpful, professional, \
                 and friendly."
            }
        }
    }
}

/// Read-only AI settings for one widget, passed with every chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub confidence_threshold: f32,
    pub max_retrieval_docs: usize,
    pub rag_enabled: bool,
    pub fallback_to_human: bool,
    pub system_prompt_type: RolePreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_system_prompt: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: "openrouter".to_string(),
            model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            confidence_threshold: 0.6,
            max_retrieval_docs: 5,
            rag_enabled: true,
            fallback_to_human: true,
            system_prompt_type: RolePreset::Support,
            custom_system_prompt: None,
        }
    }
}

impl AiConfig {
    /// The system-role text for this configuration.
    ///
    /// `Custom` with no prompt text falls back to the support preset, same
    /// as an unknown preset name.
    pub fn system_role_text(&self) -> &str {
        if self.system_prompt_type == RolePreset::Custom {
            if let Some(custom) = self.custom_system_prompt.as_deref() {
                if !custom.trim().is_empty() {
                    return custom;
                }
            }
        }
        self.system_prompt_type.preset_text()
    }
}
