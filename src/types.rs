//! Core type definitions for Sage product matching

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable catalog record, built once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: String,           // display price, e.g. "$55/eighth"
    pub category: String,        // Flower, Edibles, Vapes, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thc_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thc_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbd_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbd_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbn_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbg_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbc_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strain_type: Option<StrainType>,
    pub effects: Vec<String>,
    #[serde(default)]
    pub terpenes: BTreeMap<String, f64>, // terpene name -> percent
    pub in_stock: bool,
    pub lab_tested: bool,
}

impl Product {
    /// True when any field for the cannabinoid holds a nonzero amount
    pub fn contains(&self, cannabinoid: Cannabinoid) -> bool {
        let amounts: &[Option<f64>] = match cannabinoid {
            Cannabinoid::Thc => &[self.thc_percentage, self.thc_mg],
            Cannabinoid::Cbd => &[self.cbd_percentage, self.cbd_mg],
            Cannabinoid::Cbn => &[self.cbn_mg],
            Cannabinoid::Cbg => &[self.cbg_mg],
            Cannabinoid::Cbc => &[self.cbc_mg],
        };
        amounts.iter().flatten().any(|v| *v > 0.0)
    }

    pub fn has_effect(&self, effect: &str) -> bool {
        self.effects.iter().any(|e| e == effect)
    }

    pub fn is_strain(&self, strain: StrainType) -> bool {
        self.strain_type == Some(strain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrainType {
    Indica,
    Sativa,
    Hybrid,
}

/// Named chemical compounds tracked on a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cannabinoid {
    Thc,
    Cbd,
    Cbn,
    Cbg,
    Cbc,
}

impl Cannabinoid {
    pub const ALL: [Cannabinoid; 5] = [
        Cannabinoid::Thc,
        Cannabinoid::Cbd,
        Cannabinoid::Cbn,
        Cannabinoid::Cbg,
        Cannabinoid::Cbc,
    ];

    /// Lower-case name as it appears in free text
    pub fn keyword(&self) -> &'static str {
        match self {
            Cannabinoid::Thc => "thc",
            Cannabinoid::Cbd => "cbd",
            Cannabinoid::Cbn => "cbn",
            Cannabinoid::Cbg => "cbg",
            Cannabinoid::Cbc => "cbc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cannabinoid::Thc => "THC",
            Cannabinoid::Cbd => "CBD",
            Cannabinoid::Cbn => "CBN",
            Cannabinoid::Cbg => "CBG",
            Cannabinoid::Cbc => "CBC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    New,
    #[default]
    Casual,
    Experienced,
}

impl ExperienceLevel {
    /// Lenient parse: anything unrecognised is treated as casual
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "new" | "beginner" => ExperienceLevel::New,
            "experienced" | "expert" => ExperienceLevel::Experienced,
            _ => ExperienceLevel::Casual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::New => "new",
            ExperienceLevel::Casual => "casual",
            ExperienceLevel::Experienced => "experienced",
        }
    }
}

/// Wire shape of a chat request (POST body or GET query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SageRequestHttp {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

/// Normalized chat request
#[derive(Debug, Clone, PartialEq)]
pub struct SageRequest {
    pub query: String,       // lower-cased
    pub experience_level: ExperienceLevel,
}

pub const DEFAULT_QUERY: &str = "popular products";

impl SageRequest {
    pub fn new(query: impl AsRef<str>, experience_level: ExperienceLevel) -> Self {
        let trimmed = query.as_ref().trim();
        let query = if trimmed.is_empty() { DEFAULT_QUERY } else { trimmed };
        Self {
            query: query.to_lowercase(),
            experience_level,
        }
    }
}

impl From<SageRequestHttp> for SageRequest {
    fn from(raw: SageRequestHttp) -> Self {
        let level = raw
            .experience_level
            .as_deref()
            .map(ExperienceLevel::parse)
            .unwrap_or_default();
        SageRequest::new(raw.query.unwrap_or_default(), level)
    }
}

/// Product plus the ephemeral relevance score for one query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub match_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchPaper {
    pub title: String,
    pub authors: Vec<String>,
    pub journal: String,
    pub year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub study_type: String,
    pub credibility_score: f32,  // 0.0-10.0, hardcoded
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStrength {
    Limited,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchStudies {
    pub papers: Vec<ResearchPaper>,
    pub total_found: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceCredibility {
    pub total_papers: usize,
    pub average_credibility: f32,
    pub high_credibility_count: usize,
    pub credibility_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationalResources {
    pub research_studies: ResearchStudies,
    pub key_compounds: BTreeMap<String, String>,
    pub source_credibility: SourceCredibility,
    pub educational_level: ExperienceLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationalSummary {
    pub query: String,
    pub compounds_researched: Vec<String>,
    pub evidence_strength: EvidenceStrength,
    pub key_findings: Vec<String>,
    pub research_gaps: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub key_points: Vec<String>,
    pub dosage_guidance: String,
    pub safety_notes: String,
}

/// Full chat response
#[derive(Debug, Clone, Serialize)]
pub struct SageResponse {
    pub session_id: String,
    pub response: String,
    pub explanation: String,
    pub products: Vec<ScoredProduct>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educational_resources: Option<EducationalResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educational_summary: Option<EducationalSummary>,
    pub disclaimer: String,
    pub service_status: u16,
    pub status_message: String,
}
