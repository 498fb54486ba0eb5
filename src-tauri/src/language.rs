//! Response languages offered in the language selector

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Kaa,
    Ru,
    Uz,
}

/// Entry for the frontend's language dropdown
#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    pub value: Language,
    pub label: &'static str,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Kaa, Language::Ru, Language::Uz];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Kaa => "kaa",
            Self::Ru => "ru",
            Self::Uz => "uz",
        }
    }

    /// Native name, used both in the UI and in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Kaa => "Qaraqalpaqsha",
            Self::Ru => "Русский",
            Self::Uz => "Oʻzbekcha",
        }
    }

    /// Parse a language code; unknown codes fall back to English
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "kaa" => Self::Kaa,
            "ru" => Self::Ru,
            "uz" => Self::Uz,
            _ => Self::En,
        }
    }

    pub fn options() -> Vec<LanguageOption> {
        Self::ALL
            .iter()
            .map(|lang| LanguageOption {
                value: *lang,
                label: lang.label(),
            })
            .collect()
    }
}
