//! Persona value object representing one of the panel's analysts

use serde::{Deserialize, Serialize};

/// The fixed roster of analyst personas taking part in a panel discussion
///
/// The backend labels each opinion with a model name. That name is
/// resolved against this roster to pick display styling and to announce
/// the current speaker during the staged reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Gpt4,
    Claude,
    Gemini,
    Grok,
}

impl Persona {
    /// Every persona, in roster order
    pub const ALL: [Persona; 4] = [Persona::Gpt4, Persona::Claude, Persona::Gemini, Persona::Grok];

    /// Display name as sent by the backend
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Gpt4 => "GPT-4",
            Persona::Claude => "Claude",
            Persona::Gemini => "Gemini",
            Persona::Grok => "Grok",
        }
    }

    /// Lowercase identifier
    pub fn id(&self) -> &'static str {
        match self {
            Persona::Gpt4 => "gpt4",
            Persona::Claude => "claude",
            Persona::Gemini => "gemini",
            Persona::Grok => "grok",
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Persona::Gpt4 => "Technical Analyst",
            Persona::Claude => "Fundamental Analyst",
            Persona::Gemini => "Macro Strategist",
            Persona::Grok => "Sentiment Analyst",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Persona::Gpt4 => "📊",
            Persona::Claude => "🧠",
            Persona::Gemini => "🌐",
            Persona::Grok => "⚡",
        }
    }

    /// Hex color used for the persona's messages
    pub fn color(&self) -> &'static str {
        match self {
            Persona::Gpt4 => "#10a37f",
            Persona::Claude => "#d97706",
            Persona::Gemini => "#4285f4",
            Persona::Grok => "#e11d48",
        }
    }

    /// Resolve a backend model label to a persona.
    ///
    /// Matches the display name exactly, or the identifier ignoring case
    /// and punctuation (`gpt-4`, `GPT4` and `gpt4` all resolve to
    /// [`Persona::Gpt4`]).
    pub fn resolve(model: &str) -> Option<Persona> {
        let model = model.trim();
        if let Some(p) = Self::ALL.iter().find(|p| p.display_name() == model) {
            return Some(*p);
        }
        let folded: String = model
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL.iter().copied().find(|p| p.id() == folded)
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Who is speaking during the staged reveal.
///
/// Opinions whose model label is not on the roster are still revealed,
/// announced under their raw label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Speaker {
    Persona(Persona),
    Other(String),
}

impl Speaker {
    pub fn from_model(model: &str) -> Self {
        match Persona::resolve(model) {
            Some(p) => Speaker::Persona(p),
            None => Speaker::Other(model.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Speaker::Persona(p) => p.display_name(),
            Speaker::Other(name) => name,
        }
    }

    pub fn persona(&self) -> Option<Persona> {
        match self {
            Speaker::Persona(p) => Some(*p),
            Speaker::Other(_) => None,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
