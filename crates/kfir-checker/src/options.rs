//! Checker options, usually loaded from a `kfir.json` next to the graph.

use kfir_common::{LanguageFeature, LanguageVersionSettings};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckerOptions {
    /// Features switched on in addition to the defaults.
    pub enable_features: Vec<LanguageFeature>,
    /// Default features switched off.
    pub disable_features: Vec<LanguageFeature>,
    /// Diagnostic or category names suppressed everywhere.
    pub suppress: Vec<String>,
    /// Report every warning as an error.
    pub warnings_as_errors: bool,
    /// Checkers (by registry name) that do not run.
    pub disabled_checkers: Vec<String>,
}

impl CheckerOptions {
    /// Default language settings with this configuration's overrides applied.
    #[must_use]
    pub fn language_settings(&self) -> LanguageVersionSettings {
        let mut settings = LanguageVersionSettings::default();
        for &feature in &self.enable_features {
            settings.set_feature(feature, true);
        }
        for &feature in &self.disable_features {
            settings.set_feature(feature, false);
        }
        settings
    }
}
