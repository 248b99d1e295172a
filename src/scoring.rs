//! Additive relevance scoring for catalog products

use crate::catalog::MAX_MATCHES;
use crate::types::*;

pub const EFFECT_POINTS: u32 = 25;
pub const CANNABINOID_POINTS: u32 = 20;
pub const CATEGORY_POINTS: u32 = 30;

/// Lower-case and treat hyphens/underscores as spaces
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase().replace(['-', '_'], " ")
}

/// Score one product against a query
pub fn score_product(query: &str, product: &Product) -> u32 {
    let query = normalize_text(query);
    let mut score = 0;

    for effect in &product.effects {
        let effect = normalize_text(effect);
        if !effect.is_empty() && query.contains(&effect) {
            score += EFFECT_POINTS;
        }
    }

    for cannabinoid in Cannabinoid::ALL {
        if query.contains(cannabinoid.keyword()) && product.contains(cannabinoid) {
            score += CANNABINOID_POINTS;
        }
    }

    let category = normalize_text(&product.category);
    if !category.is_empty() && query.contains(&category) {
        score += CATEGORY_POINTS;
    }

    score
}

/// Attach scores without reordering
pub fn score_products(query: &str, products: &[Product]) -> Vec<ScoredProduct> {
    products
        .iter()
        .map(|p| ScoredProduct {
            match_score: score_product(query, p),
            product: p.clone(),
        })
        .collect()
}

/// Score every product, sort descending and keep the top matches.
///
/// The sort is stable, so equal scores keep their incoming order.
pub fn rank_products(query: &str, products: &[Product]) -> Vec<ScoredProduct> {
    let mut scored = score_products(query, products);

    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored.truncate(MAX_MATCHES);

    tracing::debug!(
        "ranked {} products, top score {}",
        products.len(),
        scored.first().map(|s| s.match_score).unwrap_or(0)
    );

    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock(id: u32, category: &str, effects: &[&str], cbd_mg: Option<f64>) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            category: category.to_string(),
            effects: effects.iter().map(|e| e.to_string()).collect(),
            cbd_mg,
            in_stock: true,
            lab_tested: true,
            ..Default::default()
        }
    }

    fn mock_catalog() -> Vec<Product> {
        vec![
            mock(1, "Energy", &["energy", "focus"], None),
            mock(2, "Tinctures", &["pain-relief", "calm"], Some(25.0)),
            mock(3, "Sleep", &["sleep", "relaxation"], Some(10.0)),
        ]
    }

    #[test]
    fn test_cbd_for_sleep_ranks_sleep_product_first() {
        let ranked = rank_products("cbd for sleep", &mock_catalog());
        assert_eq!(ranked[0].product.category, "Sleep");
        assert_eq!(ranked[0].match_score, CATEGORY_POINTS + CANNABINOID_POINTS + EFFECT_POINTS);
        assert_eq!(ranked[1].product.id, 2);
        assert_eq!(ranked[1].match_score, CANNABINOID_POINTS);
        assert_eq!(ranked[2].match_score, 0);
    }

    #[test]
    fn test_hyphenated_effects_match_spaced_query() {
        let products = mock_catalog();
        assert_eq!(score_product("need pain relief", &products[1]), EFFECT_POINTS);
        assert_eq!(score_product("need pain_relief", &products[1]), EFFECT_POINTS);
    }

    #[test]
    fn test_cannabinoid_needs_nonzero_amount() {
        let product = mock(9, "Edibles", &[], Some(0.0));
        assert_eq!(score_product("cbd gummies", &product), 0);
        assert_eq!(score_product("cbd edibles", &product), CATEGORY_POINTS);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let ranked = rank_products("xyzzy", &mock_catalog());
        let ids: Vec<u32> = ranked.iter().map(|s| s.product.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(ranked.iter().all(|s| s.match_score == 0));
    }

    #[test]
    fn test_rank_truncates_to_max_matches() {
        let mut products = mock_catalog();
        products.push(mock(4, "Sleep", &["sleep"], None));
        products.push(mock(5, "Sleep", &["sleep"], None));
        let ranked = rank_products("sleep", &products);
        assert_eq!(ranked.len(), MAX_MATCHES);
        let ids: Vec<u32> = ranked.iter().map(|s| s.product.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }
}
