//! Keyword intent classification and per-intent catalog filters

use crate::catalog::Catalog;
use crate::types::*;
use serde::Serialize;

/// Keyword bucket that selects templates and filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Sleep,
    Energy,
    Pain,
    Anxiety,
    Beginner,
    Default,
}

/// Priority order; the first category whose keyword appears wins
const INTENT_KEYWORDS: &[(IntentCategory, &[&str])] = &[
    (IntentCategory::Sleep, &["sleep", "insomnia", "tired"]),
    (IntentCategory::Energy, &["energy", "focus", "productive"]),
    (IntentCategory::Pain, &["pain", "hurt", "ache"]),
    (IntentCategory::Anxiety, &["anxiety", "stress", "calm"]),
    (IntentCategory::Beginner, &["beginner", "first", "new"]),
];

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Sleep => "sleep",
            IntentCategory::Energy => "energy",
            IntentCategory::Pain => "pain",
            IntentCategory::Anxiety => "anxiety",
            IntentCategory::Beginner => "beginner",
            IntentCategory::Default => "default",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        INTENT_KEYWORDS
            .iter()
            .find(|(cat, _)| cat == self)
            .map(|(_, kws)| *kws)
            .unwrap_or(&[])
    }

    /// Whether a product belongs to this intent's candidate set
    pub fn admits(&self, product: &Product) -> bool {
        match self {
            IntentCategory::Sleep => {
                product.has_effect("sleep") || product.is_strain(StrainType::Indica)
            }
            IntentCategory::Energy => {
                product.has_effect("energy")
                    || product.has_effect("focus")
                    || product.is_strain(StrainType::Sativa)
            }
            IntentCategory::Pain => {
                product.has_effect("pain relief")
                    || product.thc_percentage.map_or(false, |pct| pct > 20.0)
            }
            IntentCategory::Anxiety => {
                product.has_effect("calm")
                    || product.has_effect("balanced")
                    || product.contains(Cannabinoid::Cbd)
            }
            IntentCategory::Beginner => {
                product.thc_mg.map_or(false, |mg| mg <= 100.0)
                    || product.thc_percentage.map_or(false, |pct| pct < 20.0)
                    || product.contains(Cannabinoid::Cbd)
            }
            IntentCategory::Default => false,
        }
    }
}

/// Classify a lower-cased query into its first matching intent
pub fn classify(query: &str) -> IntentCategory {
    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
        .map(|(cat, _)| *cat)
        .unwrap_or(IntentCategory::Default)
}

/// Products admitted by the intent, in catalog order.
///
/// Default intent, or an intent that admits nothing, yields the catalog's
/// default slice so callers never see an empty candidate set.
pub fn filter_catalog(intent: IntentCategory, catalog: &Catalog) -> Vec<Product> {
    let admitted: Vec<Product> = catalog
        .products()
        .iter()
        .filter(|p| intent.admits(p))
        .cloned()
        .collect();

    if admitted.is_empty() {
        catalog.default_slice().to_vec()
    } else {
        admitted
    }
}
