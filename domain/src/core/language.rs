//! Language value object and localized fallback notices

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Language a panel discussion was generated in (Value Object)
///
/// Stored as a lowercase tag such as `en`, `zh` or `pt-br`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn new(tag: impl Into<String>) -> Result<Self, DomainError> {
        let tag = tag.into();
        let normalized = tag.trim().to_ascii_lowercase().replace('_', "-");
        let valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(DomainError::InvalidLanguage(tag));
        }
        Ok(Self(normalized))
    }

    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary subtag, e.g. `pt` for `pt-br`
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// Generic notice shown when generation fails without a backend message
    pub fn generation_failed_notice(&self) -> &'static str {
        match self.primary() {
            "zh" => "生成专家讨论失败，请稍后重试",
            "ja" => "パネルディスカッションの生成に失敗しました",
            "es" => "No se pudo generar la discusión del panel",
            "fr" => "Impossible de générer la discussion du panel",
            "de" => "Die Paneldiskussion konnte nicht erstellt werden",
            _ => "Failed to generate panel discussion",
        }
    }

    /// Notice shown after a discussion has been generated
    pub fn generation_succeeded_notice(&self) -> &'static str {
        match self.primary() {
            "zh" => "专家讨论已生成",
            "ja" => "パネルディスカッションを生成しました",
            "es" => "Discusión del panel generada",
            "fr" => "Discussion du panel générée",
            "de" => "Paneldiskussion erstellt",
            _ => "Panel discussion generated",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Language {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}
