//! Language features whose support varies across language versions.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A language change that some checkers consult before choosing between an
/// old (usually warning) and a new (usually error) behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageFeature {
    /// Protected calls from public-API inline functions become errors.
    ProhibitProtectedCallFromInline,
    /// A use-site-targeted annotation repeated on a property and its accessor is an error.
    ProhibitRepeatedUseSiteTargetAnnotations,
    /// `@JvmInline value class` with more than one underlying property.
    ValueClasses,
    /// Value classes whose underlying type is a type parameter or generic array.
    GenericInlineClassParameter,
    /// Non-`@Repeatable` annotations applied twice are always an error.
    RepeatableAnnotations,
    /// `@Retention(SOURCE)` is required on `@Target(EXPRESSION)` annotations.
    RestrictRetentionForExpressionAnnotations,
}

impl LanguageFeature {
    pub const ALL: [LanguageFeature; 6] = [
        Self::ProhibitProtectedCallFromInline,
        Self::ProhibitRepeatedUseSiteTargetAnnotations,
        Self::ValueClasses,
        Self::GenericInlineClassParameter,
        Self::RepeatableAnnotations,
        Self::RestrictRetentionForExpressionAnnotations,
    ];

    /// Features enabled by default in the current language version.
    #[must_use]
    pub const fn enabled_by_default(self) -> bool {
        match self {
            Self::ProhibitProtectedCallFromInline => false,
            Self::ProhibitRepeatedUseSiteTargetAnnotations => false,
            Self::ValueClasses => false,
            Self::GenericInlineClassParameter => false,
            Self::RepeatableAnnotations => true,
            Self::RestrictRetentionForExpressionAnnotations => true,
        }
    }
}

/// Key-value capability lookup: `supports_feature(flag) -> bool`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageVersionSettings {
    #[serde(default)]
    enabled: FxHashSet<LanguageFeature>,
}

impl Default for LanguageVersionSettings {
    fn default() -> Self {
        let enabled = LanguageFeature::ALL
            .into_iter()
            .filter(|feature| feature.enabled_by_default())
            .collect();
        Self { enabled }
    }
}

impl LanguageVersionSettings {
    /// Settings with no feature enabled at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            enabled: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn supports_feature(&self, feature: LanguageFeature) -> bool {
        self.enabled.contains(&feature)
    }

    #[must_use]
    pub fn with_feature(mut self, feature: LanguageFeature, enabled: bool) -> Self {
        self.set_feature(feature, enabled);
        self
    }

    pub fn set_feature(&mut self, feature: LanguageFeature, enabled: bool) {
        if enabled {
            self.enabled.insert(feature);
        } else {
            self.enabled.remove(&feature);
        }
    }

    /// Enabled features in a stable order.
    #[must_use]
    pub fn enabled_features(&self) -> Vec<LanguageFeature> {
        let mut features: Vec<_> = self.enabled.iter().copied().collect();
        features.sort();
        features
    }
}
