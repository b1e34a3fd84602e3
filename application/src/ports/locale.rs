//! Active-locale port

use panel_domain::Language;

/// Read-only view of the user's active language.
///
/// Decides both the `language` of generation requests and which cached
/// panels are valid.
pub trait LocaleProvider: Send + Sync {
    fn active_language(&self) -> Language;
}
