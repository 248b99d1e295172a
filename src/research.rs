//! Mock research papers and educational summaries
//!
//! Every paper here is static sample data. Selection is driven by the same
//! keyword buckets as intent classification, but each research topic is
//! checked independently so one query can pull in several papers.

use crate::intent::IntentCategory;
use crate::types::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Upper bound on papers attached to one chat response
pub const MAX_PAPERS: usize = 4;

/// Credibility at or above this counts as high quality
pub const HIGH_CREDIBILITY: f32 = 8.0;

/// Topics that carry their own paper and summary content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchTopic {
    Sleep,
    Pain,
    Anxiety,
    General,
}

impl ResearchTopic {
    const MATCHABLE: [(ResearchTopic, IntentCategory); 3] = [
        (ResearchTopic::Sleep, IntentCategory::Sleep),
        (ResearchTopic::Pain, IntentCategory::Pain),
        (ResearchTopic::Anxiety, IntentCategory::Anxiety),
    ];

    /// Every topic whose keywords appear in the query, in fixed order
    pub fn matching(query: &str) -> Vec<ResearchTopic> {
        Self::MATCHABLE
            .iter()
            .filter(|(_, intent)| intent.keywords().iter().any(|kw| query.contains(kw)))
            .map(|(topic, _)| *topic)
            .collect()
    }

    /// First matching topic, used for the summary branch
    pub fn primary(query: &str) -> ResearchTopic {
        Self::matching(query)
            .into_iter()
            .next()
            .unwrap_or(ResearchTopic::General)
    }
}

/// Static paper collection
#[derive(Debug, Clone)]
pub struct ResearchCorpus {
    base: Vec<ResearchPaper>,
    topical: Vec<(ResearchTopic, ResearchPaper)>,
    library_only: Vec<ResearchPaper>,
}

impl ResearchCorpus {
    pub fn mock() -> Self {
        let base = vec![
            paper(
                "Cannabinoids and the Endocannabinoid System: A Clinical Overview",
                &["Lu HC", "Mackie K"],
                "Biological Psychiatry",
                2021,
                Some("10.1016/j.biopsych.2020.07.012"),
                "The endocannabinoid system regulates sleep, mood, appetite and pain through CB1 and CB2 \
                 receptors. This review summarises how plant cannabinoids interact with these pathways.",
                "systematic review",
                9.1,
            ),
            paper(
                "Understanding Cannabis Strains: Chemotype over Indica and Sativa Labels",
                &["Smith CJ", "Vergara D", "Keegan B", "Jikomes N"],
                "PLOS ONE",
                2022,
                Some("10.1371/journal.pone.0267498"),
                "Analysis of commercial cannabis products shows terpene and cannabinoid profiles predict \
                 effects more reliably than indica, sativa or hybrid labelling.",
                "observational study",
                7.8,
            ),
        ];

        let topical = vec![
            (
                ResearchTopic::Sleep,
                paper(
                    "Cannabis and Sleep: A Randomized Controlled Trial of THC and CBN",
                    &["Walsh JH", "Maddison KJ", "Rankin T", "Eastwood PR"],
                    "Sleep Medicine",
                    2021,
                    Some("10.1016/j.sleep.2021.03.021"),
                    "THC reduced sleep latency and increased deep sleep phases in adults with insomnia. CBN \
                     showed an additive sedating effect at low doses.",
                    "randomized clinical trial",
                    8.7,
                ),
            ),
            (
                ResearchTopic::Pain,
                paper(
                    "Cannabinoids for Chronic Pain: Meta-Analysis of Randomized Trials",
                    &["Wang L", "Hong PJ", "May C", "Busse JW"],
                    "BMJ",
                    2021,
                    Some("10.1136/bmj.n1034"),
                    "Non-inhaled medical cannabis produced small to moderate improvements in chronic pain \
                     intensity and sleep quality compared with placebo.",
                    "meta-analysis",
                    9.3,
                ),
            ),
            (
                ResearchTopic::Anxiety,
                paper(
                    "Dose-Dependent Effects of THC on Anxiety and Stress Reactivity",
                    &["Childs E", "Lutz JA", "de Wit H"],
                    "Drug and Alcohol Dependence",
                    2020,
                    Some("10.1016/j.drugalcdep.2017.05.030"),
                    "Low doses of THC (7.5mg) reduced subjective stress after a psychosocial stressor, while \
                     higher doses increased anxiety and negative mood.",
                    "clinical trial",
                    8.2,
                ),
            ),
        ];

        let library_only = vec![paper(
            "Anti-Inflammatory Properties of Cannabidiol: A Review",
            &["Atalay S", "Jarocka-Karpowicz I", "Skrzydlewska E"],
            "Antioxidants",
            2020,
            Some("10.3390/antiox9010021"),
            "CBD modulates inflammatory cytokine release and oxidative stress in preclinical models, \
             supporting further study in inflammatory conditions.",
            "review",
            6.9,
        )];

        Self {
            base,
            topical,
            library_only,
        }
    }

    /// Every paper in the collection
    pub fn all(&self) -> Vec<ResearchPaper> {
        self.base
            .iter()
            .chain(self.topical.iter().map(|(_, p)| p))
            .chain(self.library_only.iter())
            .cloned()
            .collect()
    }

    /// Base papers plus at most one per matched topic, capped at `MAX_PAPERS`
    pub fn papers_for(&self, query: &str) -> Vec<ResearchPaper> {
        let mut papers = self.base.clone();
        for topic in ResearchTopic::matching(query) {
            if let Some((_, p)) = self.topical.iter().find(|(t, _)| *t == topic) {
                papers.push(p.clone());
            }
        }
        papers.truncate(MAX_PAPERS);
        debug!("selected {} research papers for '{}'", papers.len(), query);
        papers
    }

    /// Build both educational blocks for a chat response
    pub fn educate(
        &self,
        query: &str,
        level: ExperienceLevel,
    ) -> (EducationalResources, EducationalSummary) {
        let papers = self.papers_for(query);
        let topic = ResearchTopic::primary(query);
        let key_compounds = key_compounds(topic);

        let resources = EducationalResources {
            source_credibility: source_credibility(&papers),
            research_studies: ResearchStudies {
                total_found: papers.len(),
                papers,
            },
            key_compounds: key_compounds.clone(),
            educational_level: level,
        };

        let evidence_strength = evidence_strength(topic);
        let summary = EducationalSummary {
            query: query.to_string(),
            compounds_researched: compounds_researched(query, &key_compounds),
            evidence_strength,
            key_findings: lines(key_findings(topic)),
            research_gaps: lines(research_gaps(topic)),
            confidence_level: match evidence_strength {
                EvidenceStrength::Strong => ConfidenceLevel::High,
                EvidenceStrength::Moderate => ConfidenceLevel::Moderate,
                EvidenceStrength::Limited => ConfidenceLevel::Low,
            },
            key_points: lines(key_points(topic)),
            dosage_guidance: dosage_guidance(topic).to_string(),
            safety_notes: safety_notes(topic).to_string(),
        };

        (resources, summary)
    }
}

#[allow(clippy::too_many_arguments)]
fn paper(
    title: &str,
    authors: &[&str],
    journal: &str,
    year: u16,
    doi: Option<&str>,
    abstract_text: &str,
    study_type: &str,
    credibility_score: f32,
) -> ResearchPaper {
    ResearchPaper {
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        journal: journal.to_string(),
        year,
        doi: doi.map(str::to_string),
        pmid: None,
        abstract_text: abstract_text.split_whitespace().collect::<Vec<_>>().join(" "),
        study_type: study_type.to_string(),
        credibility_score,
        source: "PubMed".to_string(),
        url: Some(format!(
            "https://pubmed.ncbi.nlm.nih.gov/?term={}",
            urlencoding::encode(title)
        )),
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn source_credibility(papers: &[ResearchPaper]) -> SourceCredibility {
    let total = papers.len();
    let average = if total == 0 {
        0.0
    } else {
        let sum: f32 = papers.iter().map(|p| p.credibility_score).sum();
        (sum / total as f32 * 10.0).round() / 10.0
    };
    let level = if average >= HIGH_CREDIBILITY {
        "high"
    } else if average >= 6.0 {
        "moderate"
    } else {
        "low"
    };

    SourceCredibility {
        total_papers: total,
        average_credibility: average,
        high_credibility_count: papers
            .iter()
            .filter(|p| p.credibility_score >= HIGH_CREDIBILITY)
            .count(),
        credibility_level: level.to_string(),
    }
}

fn evidence_strength(topic: ResearchTopic) -> EvidenceStrength {
    match topic {
        ResearchTopic::Pain => EvidenceStrength::Strong,
        ResearchTopic::Sleep | ResearchTopic::Anxiety => EvidenceStrength::Moderate,
        ResearchTopic::General => EvidenceStrength::Limited,
    }
}

fn key_compounds(topic: ResearchTopic) -> BTreeMap<String, String> {
    let entries: &[(&str, &str)] = match topic {
        ResearchTopic::Sleep => &[
            ("THC", "Primary psychoactive compound that reduces REM sleep and increases deep sleep"),
            ("CBN", "Mildly psychoactive cannabinoid with sedating properties"),
            ("Myrcene", "Terpene known for sedating, muscle-relaxing effects"),
        ],
        ResearchTopic::Pain => &[
            ("THC", "Activates CB1 receptors to modulate pain perception"),
            ("CBD", "May reduce inflammation and soften THC's psychoactive effects"),
            ("Caryophyllene", "Terpene that binds CB2 receptors involved in inflammation"),
        ],
        ResearchTopic::Anxiety => &[
            ("CBD", "Non-psychoactive cannabinoid that may counteract THC-induced anxiety"),
            ("Linalool", "Lavender terpene with anxiolytic properties"),
        ],
        ResearchTopic::General => &[
            ("THC", "Primary psychoactive compound"),
            ("CBD", "Non-psychoactive, may reduce THC anxiety"),
            ("CBN", "Mildly psychoactive, promotes sleep"),
        ],
    };
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Cannabinoids named in the query first, then the topic's key compounds
fn compounds_researched(query: &str, key_compounds: &BTreeMap<String, String>) -> Vec<String> {
    let mut compounds: Vec<String> = Cannabinoid::ALL
        .iter()
        .filter(|c| query.contains(c.keyword()))
        .map(|c| c.label().to_string())
        .collect();
    for name in key_compounds.keys() {
        if !compounds.contains(name) {
            compounds.push(name.clone());
        }
    }
    compounds
}

fn key_findings(topic: ResearchTopic) -> &'static [&'static str] {
    match topic {
        ResearchTopic::Sleep => &[
            "THC shortens sleep latency in adults with insomnia",
            "CBN may add a mild sedating effect at low doses",
            "Long-term nightly use can reduce REM sleep",
        ],
        ResearchTopic::Pain => &[
            "Cannabinoids produce small to moderate reductions in chronic pain",
            "Topicals provide localized relief without psychoactive effects",
            "Balanced THC:CBD ratios reduce side effects at similar efficacy",
        ],
        ResearchTopic::Anxiety => &[
            "Low THC doses (2.5-7.5mg) may reduce stress reactivity",
            "Higher THC doses can increase anxiety",
            "CBD may buffer THC-induced anxiety",
        ],
        ResearchTopic::General => &[
            "Effects depend on cannabinoid and terpene profile more than strain label",
            "Onset and duration vary widely between inhaled and edible products",
        ],
    }
}

fn research_gaps(topic: ResearchTopic) -> &'static [&'static str] {
    match topic {
        ResearchTopic::Sleep => &["Few long-term studies of nightly use", "Limited data on CBN alone"],
        ResearchTopic::Pain => &["Inhaled products are under-studied in trials"],
        ResearchTopic::Anxiety => &["Dose thresholds vary widely between individuals"],
        ResearchTopic::General => &["Most consumer product claims lack clinical validation"],
    }
}

fn key_points(topic: ResearchTopic) -> &'static [&'static str] {
    match topic {
        ResearchTopic::Pain => &[
            "THC activates CB1 receptors to modulate pain perception",
            "Topicals provide localized relief without psychoactive effects",
            "Start with lower doses and increase gradually",
        ],
        _ => &[
            "Start with low doses and increase gradually",
            "Effects can take 5-10min for smoking, 30-120min for edibles",
            "Stay hydrated and have snacks ready",
        ],
    }
}

fn dosage_guidance(topic: ResearchTopic) -> &'static str {
    match topic {
        ResearchTopic::Pain => "Begin with 5-10mg THC for edibles, one puff for inhalables",
        ResearchTopic::Anxiety => "Try 2.5-5mg THC or a 1:1 THC:CBD product, and wait 2 hours before more",
        _ => "Beginners: 2.5-5mg THC for edibles, one small puff for flower",
    }
}

fn safety_notes(topic: ResearchTopic) -> &'static str {
    match topic {
        ResearchTopic::Pain => {
            "Do not drive or operate machinery. Effects can last 4-8 hours with edibles."
        }
        _ => "Must be 21+. Do not drive. Keep away from children and pets.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_papers_always_present() {
        let corpus = ResearchCorpus::mock();
        let papers = corpus.papers_for("xyzzy nonsense");
        assert_eq!(papers.len(), 2);
        assert_eq!(papers, corpus.base);
    }

    #[test]
    fn test_one_paper_per_topic_and_cap() {
        let corpus = ResearchCorpus::mock();
        let papers = corpus.papers_for("insomnia");
        assert_eq!(papers.len(), 3);
        assert!(papers[2].title.contains("Sleep"));

        let papers = corpus.papers_for("sleep, pain and anxiety");
        assert_eq!(papers.len(), MAX_PAPERS);
        assert!(papers[2].title.contains("Sleep"));
        assert!(papers[3].title.contains("Pain"));
    }

    #[test]
    fn test_credibility_scores_in_range() {
        for p in ResearchCorpus::mock().all() {
            assert!((0.0..=10.0).contains(&p.credibility_score), "{}", p.title);
            assert!(p.url.as_deref().unwrap_or("").starts_with("https://pubmed.ncbi.nlm.nih.gov/?term="));
        }
    }

    #[test]
    fn test_summary_follows_primary_topic() {
        let corpus = ResearchCorpus::mock();
        let (resources, summary) = corpus.educate("cbd for chronic pain", ExperienceLevel::New);
        assert_eq!(summary.evidence_strength, EvidenceStrength::Strong);
        assert_eq!(summary.confidence_level, ConfidenceLevel::High);
        assert_eq!(summary.compounds_researched[0], "CBD");
        assert_eq!(summary.compounds_researched.iter().filter(|c| *c == "CBD").count(), 1);
        assert_eq!(resources.research_studies.total_found, 3);
        assert_eq!(resources.educational_level, ExperienceLevel::New);

        let (_, summary) = corpus.educate("popular products", ExperienceLevel::Casual);
        assert_eq!(summary.evidence_strength, EvidenceStrength::Limited);
        assert_eq!(summary.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_source_credibility_summary() {
        let corpus = ResearchCorpus::mock();
        let cred = source_credibility(&corpus.papers_for("pain"));
        assert_eq!(cred.total_papers, 3);
        assert_eq!(cred.high_credibility_count, 2);
        assert_eq!(cred.credibility_level, "high");

        let empty = source_credibility(&[]);
        assert_eq!(empty.average_credibility, 0.0);
        assert_eq!(empty.credibility_level, "low");
    }
}
