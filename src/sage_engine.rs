//! SageEngine: classify, match, explain and assemble one chat response

use crate::catalog::{Catalog, SharedCatalog};
use crate::config::MatchStrategy;
use crate::error::{Result, SageError};
use crate::explanation::generate_explanation;
use crate::intent::{classify, filter_catalog, IntentCategory};
use crate::research::ResearchCorpus;
use crate::scoring::{rank_products, score_products};
use crate::types::*;
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tracing::{debug, info};

pub const DISCLAIMER: &str =
    "Must be 21+ with valid ID. NJ law limits: 1oz flower, 5g concentrates, or 1000mg edibles per day.";
pub const STATUS_MESSAGE: &str = "Powered by Premo Cannabis - Keyport, NJ";

const SUGGESTIONS: &[&str] = &[
    "Tell me about your specific needs",
    "What effects are you looking for?",
    "Do you prefer flower or edibles?",
    "What's your experience level?",
];

/// Stateless request processor over a read-only catalog (thread-safe via Arc)
pub struct SageEngine {
    catalog: SharedCatalog,
    research: ResearchCorpus,
    strategy: MatchStrategy,
    max_query_chars: usize,
}

pub type SharedSageEngine = Arc<SageEngine>;

/// Products chosen for one query plus the intent that drove the choice
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub intent: IntentCategory,
    pub products: Vec<ScoredProduct>,
}

impl SageEngine {
    /// Build a shared engine. Every response, fallback included, draws its
    /// products from the catalog, so an empty one is rejected.
    pub fn new(
        catalog: Catalog,
        research: ResearchCorpus,
        strategy: MatchStrategy,
        max_query_chars: usize,
    ) -> Result<SharedSageEngine> {
        if catalog.is_empty() {
            return Err(SageError::EmptyCatalog);
        }
        Ok(Self::shared(catalog, research, strategy, max_query_chars))
    }

    /// Premo catalog and mock research with default limits
    pub fn new_simple(strategy: MatchStrategy) -> SharedSageEngine {
        Self::shared(Catalog::premo(), ResearchCorpus::mock(), strategy, 2000)
    }

    fn shared(
        catalog: Catalog,
        research: ResearchCorpus,
        strategy: MatchStrategy,
        max_query_chars: usize,
    ) -> SharedSageEngine {
        Arc::new(Self {
            catalog: Arc::new(catalog),
            research,
            strategy,
            max_query_chars,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn research(&self) -> &ResearchCorpus {
        &self.research
    }

    /// Classify and pick 1..=3 products for a lower-cased query
    pub fn classify_and_score(&self, query: &str) -> MatchOutcome {
        let intent = classify(query);

        let products = match (self.strategy, intent) {
            // Default intent keeps the fixed slice in catalog order
            (MatchStrategy::Intent, IntentCategory::Default) => {
                score_products(query, self.catalog.default_slice())
            }
            (MatchStrategy::Scored, IntentCategory::Default) => {
                rank_products(query, self.catalog.products())
            }
            // A recognised intent always constrains the candidates
            _ => {
                let candidates = filter_catalog(intent, &self.catalog);
                rank_products(query, &candidates)
            }
        };

        let products = if products.is_empty() {
            score_products(query, self.catalog.default_slice())
        } else {
            products
        };

        debug!(
            "intent={} strategy={:?} products={:?}",
            intent.as_str(),
            self.strategy,
            products.iter().map(|p| p.product.id).collect::<Vec<_>>()
        );

        MatchOutcome { intent, products }
    }

    /// Main entry point: build the full chat response
    pub fn respond(&self, req: &SageRequest) -> Result<SageResponse> {
        let start = Instant::now();

        let len = req.query.chars().count();
        if len > self.max_query_chars {
            return Err(SageError::QueryTooLong {
                len,
                max: self.max_query_chars,
            });
        }

        let outcome = self.classify_and_score(&req.query);
        let explanation = generate_explanation(outcome.intent, req.experience_level);
        let (resources, summary) = self.research.educate(&req.query, req.experience_level);

        info!(
            "Sage response: intent={}, level={}, {} products, {} papers in {}us",
            outcome.intent.as_str(),
            req.experience_level.as_str(),
            outcome.products.len(),
            resources.research_studies.papers.len(),
            start.elapsed().as_micros()
        );

        Ok(SageResponse {
            session_id: session_id(),
            response: explanation.clone(),
            explanation,
            products: outcome.products,
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            educational_resources: Some(resources),
            educational_summary: Some(summary),
            disclaimer: DISCLAIMER.to_string(),
            service_status: 200,
            status_message: STATUS_MESSAGE.to_string(),
        })
    }

    /// Hardcoded two-product body served whenever a request cannot be processed
    pub fn fallback_response(&self) -> SageResponse {
        fallback_response(&self.catalog)
    }
}

pub fn fallback_response(catalog: &Catalog) -> SageResponse {
    let explanation =
        "Welcome to Premo Cannabis! Here are some of our popular products:".to_string();
    SageResponse {
        session_id: session_id(),
        response: explanation.clone(),
        explanation,
        products: catalog
            .products()
            .iter()
            .take(2)
            .map(|p| ScoredProduct {
                product: p.clone(),
                match_score: 0,
            })
            .collect(),
        suggestions: vec![
            "Ask about our deals".to_string(),
            "Tell me what you need help with".to_string(),
        ],
        educational_resources: None,
        educational_summary: None,
        disclaimer: DISCLAIMER.to_string(),
        service_status: 200,
        status_message: STATUS_MESSAGE.to_string(),
    }
}

fn session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("sage-{}", millis)
}
