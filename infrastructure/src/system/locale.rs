//! Locale adapter

use panel_application::LocaleProvider;
use panel_domain::Language;

/// Locale fixed at startup from configuration or the command line
pub struct FixedLocale {
    language: Language,
}

impl FixedLocale {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl LocaleProvider for FixedLocale {
    fn active_language(&self) -> Language {
        self.language.clone()
    }
}
