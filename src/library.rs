//! Research library browsing: filter, sort and paginate mock papers

use crate::types::ResearchPaper;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Date,
    Credibility,
    Citations,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryCategory {
    #[default]
    All,
    Sleep,
    Anxiety,
    Pain,
    Inflammation,
    ClinicalTrials,
    Reviews,
}

impl LibraryCategory {
    fn admits(&self, paper: &ResearchPaper) -> bool {
        let title = paper.title.to_lowercase();
        let abstract_text = paper.abstract_text.to_lowercase();
        let study_type = paper.study_type.to_lowercase();
        let mentions = |words: &[&str]| {
            words
                .iter()
                .any(|w| title.contains(w) || abstract_text.contains(w))
        };

        match self {
            LibraryCategory::All => true,
            LibraryCategory::Sleep => mentions(&["sleep", "insomnia"]),
            LibraryCategory::Anxiety => mentions(&["anxiety", "stress"]),
            LibraryCategory::Pain => mentions(&["pain", "analgesia"]),
            LibraryCategory::Inflammation => mentions(&["inflammation", "inflammatory"]),
            LibraryCategory::ClinicalTrials => {
                study_type.contains("clinical") || study_type.contains("trial")
            }
            LibraryCategory::Reviews => {
                study_type.contains("review") || study_type.contains("meta-analysis")
            }
        }
    }
}

/// Library query; every filter is optional and they are AND-ed together
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub category: LibraryCategory,
    #[serde(default)]
    pub study_types: Vec<String>,
    pub min_credibility: Option<f32>,
    pub max_credibility: Option<f32>,
    pub min_year: Option<u16>,
    pub max_year: Option<u16>,
    #[serde(default)]
    pub sort_by: SortBy,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryPage {
    pub papers: Vec<ResearchPaper>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl LibraryRequest {
    fn admits(&self, paper: &ResearchPaper) -> bool {
        if let Some(term) = self.search_term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !paper.title.to_lowercase().contains(&term)
                && !paper.abstract_text.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        if !self.category.admits(paper) {
            return false;
        }

        if !self.study_types.is_empty() {
            let study_type = paper.study_type.to_lowercase();
            if !self
                .study_types
                .iter()
                .any(|t| study_type.contains(&t.to_lowercase()))
            {
                return false;
            }
        }

        let score = paper.credibility_score;
        if self.min_credibility.map_or(false, |min| score < min)
            || self.max_credibility.map_or(false, |max| score > max)
        {
            return false;
        }

        !(self.min_year.map_or(false, |min| paper.year < min)
            || self.max_year.map_or(false, |max| paper.year > max))
    }
}

/// Filter, sort and slice out one page
pub fn browse(papers: Vec<ResearchPaper>, req: &LibraryRequest) -> LibraryPage {
    let mut filtered: Vec<ResearchPaper> = papers.into_iter().filter(|p| req.admits(p)).collect();

    // No citation counts exist, so citations falls back to date and relevance to credibility
    match req.sort_by {
        SortBy::Relevance | SortBy::Credibility => filtered.sort_by(|a, b| {
            b.credibility_score
                .partial_cmp(&a.credibility_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortBy::Date | SortBy::Citations => filtered.sort_by(|a, b| b.year.cmp(&a.year)),
    }

    let per_page = req.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let total = filtered.len();
    let total_pages = total.div_ceil(per_page);
    let page = req.page.unwrap_or(1).max(1);

    let papers = filtered
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    LibraryPage {
        papers,
        page,
        per_page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::ResearchCorpus;

    fn corpus() -> Vec<ResearchPaper> {
        ResearchCorpus::mock().all()
    }

    #[test]
    fn test_default_request_returns_everything_by_credibility() {
        let page = browse(corpus(), &LibraryRequest::default());
        assert_eq!(page.total, 6);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        let scores: Vec<f32> = page.papers.iter().map(|p| p.credibility_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_category_and_search_filters() {
        let req = LibraryRequest {
            category: LibraryCategory::Reviews,
            ..Default::default()
        };
        let page = browse(corpus(), &req);
        assert!(page.total >= 2);
        assert!(page.papers.iter().all(|p| p.study_type.contains("review") || p.study_type.contains("meta-analysis")));

        let req = LibraryRequest {
            search_term: Some("INSOMNIA".into()),
            ..Default::default()
        };
        let page = browse(corpus(), &req);
        assert_eq!(page.total, 1);
        assert!(page.papers[0].title.contains("Sleep"));
    }

    #[test]
    fn test_credibility_and_year_ranges_are_inclusive() {
        let req = LibraryRequest {
            min_credibility: Some(8.7),
            max_year: Some(2021),
            sort_by: SortBy::Date,
            ..Default::default()
        };
        let page = browse(corpus(), &req);
        assert!(page.papers.iter().all(|p| p.credibility_score >= 8.7 && p.year <= 2021));
        assert!(page.papers.iter().any(|p| p.credibility_score == 8.7));
    }

    #[test]
    fn test_pagination() {
        let req = LibraryRequest {
            per_page: Some(4),
            page: Some(2),
            ..Default::default()
        };
        let page = browse(corpus(), &req);
        assert_eq!(page.total, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.papers.len(), 2);

        let req = LibraryRequest {
            per_page: Some(4),
            page: Some(9),
            ..Default::default()
        };
        assert!(browse(corpus(), &req).papers.is_empty());
    }

    #[test]
    fn test_category_deserializes_kebab_case() {
        let req: LibraryRequest =
            serde_json::from_str(r#"{"category":"clinical-trials","sort_by":"date"}"#).unwrap();
        assert_eq!(req.category, LibraryCategory::ClinicalTrials);
        assert_eq!(req.sort_by, SortBy::Date);
    }
}
