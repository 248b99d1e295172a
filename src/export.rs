//! Citation export (JSON, CSV, BibTeX, RIS)

use crate::error::SageError;
use crate::types::ResearchPaper;
use chrono::Utc;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Bibtex,
    Ris,
}

impl FromStr for ExportFormat {
    type Err = SageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "bibtex" | "bib" => Ok(ExportFormat::Bibtex),
            "ris" => Ok(ExportFormat::Ris),
            other => Err(SageError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Bibtex => "application/x-bibtex",
            ExportFormat::Ris => "application/x-research-info-systems",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Bibtex => "bib",
            ExportFormat::Ris => "ris",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub include_abstracts: bool,
}

pub fn render(
    format: ExportFormat,
    query: &str,
    papers: &[ResearchPaper],
    opts: ExportOptions,
) -> Result<String, SageError> {
    match format {
        ExportFormat::Json => to_json(query, papers, opts),
        ExportFormat::Csv => Ok(to_csv(papers, opts)),
        ExportFormat::Bibtex => Ok(to_bibtex(papers)),
        ExportFormat::Ris => Ok(to_ris(papers, opts)),
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    query: &'a str,
    export_date: String,
    total_papers: usize,
    papers: Vec<JsonPaper<'a>>,
}

#[derive(Serialize)]
struct JsonPaper<'a> {
    title: &'a str,
    authors: &'a [String],
    journal: &'a str,
    year: u16,
    doi: Option<&'a str>,
    pmid: Option<&'a str>,
    url: Option<&'a str>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    abstract_text: Option<&'a str>,
    study_type: &'a str,
    credibility_score: f32,
    source: &'a str,
}

fn to_json(query: &str, papers: &[ResearchPaper], opts: ExportOptions) -> Result<String, SageError> {
    let export = JsonExport {
        query,
        export_date: Utc::now().to_rfc3339(),
        total_papers: papers.len(),
        papers: papers
            .iter()
            .map(|p| JsonPaper {
                title: &p.title,
                authors: &p.authors,
                journal: &p.journal,
                year: p.year,
                doi: p.doi.as_deref(),
                pmid: p.pmid.as_deref(),
                url: p.url.as_deref(),
                abstract_text: opts.include_abstracts.then_some(p.abstract_text.as_str()),
                study_type: &p.study_type,
                credibility_score: p.credibility_score,
                source: &p.source,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn to_csv(papers: &[ResearchPaper], opts: ExportOptions) -> String {
    let mut headers = vec![
        "Title",
        "Authors",
        "Journal",
        "Year",
        "DOI",
        "PMID",
        "URL",
        "Study Type",
        "Credibility Score",
        "Citation Count",
        "Source",
    ];
    if opts.include_abstracts {
        headers.push("Abstract");
    }

    let mut out = vec![headers.join(",")];
    for p in papers {
        let mut row = vec![
            quote(&p.title),
            quote(&p.authors.join(", ")),
            quote(&p.journal),
            p.year.to_string(),
            p.doi.clone().unwrap_or_default(),
            p.pmid.clone().unwrap_or_default(),
            p.url.clone().unwrap_or_default(),
            quote(&p.study_type),
            p.credibility_score.to_string(),
            String::new(),
            quote(&p.source),
        ];
        if opts.include_abstracts {
            row.push(quote(&p.abstract_text));
        }
        out.push(row.join(","));
    }
    out.join("\n")
}

fn bibtex_key(paper: &ResearchPaper, index: usize) -> String {
    match paper.doi.as_deref() {
        Some(doi) => doi.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
        None => format!("paper{}", index + 1),
    }
}

fn to_bibtex(papers: &[ResearchPaper]) -> String {
    papers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut entry = format!(
                "@article{{{},\n  title={{{}}},\n  author={{{}}},\n  journal={{{}}},\n  year={{{}}},",
                bibtex_key(p, i),
                p.title,
                p.authors.join(" and "),
                p.journal,
                p.year
            );
            if let Some(doi) = &p.doi {
                entry.push_str(&format!("\n  doi={{{}}},", doi));
            }
            if let Some(url) = &p.url {
                entry.push_str(&format!("\n  url={{{}}},", url));
            }
            entry.push_str(&format!(
                "\n  note={{Credibility Score: {}/10}}\n}}",
                p.credibility_score
            ));
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn to_ris(papers: &[ResearchPaper], opts: ExportOptions) -> String {
    papers
        .iter()
        .map(|p| {
            let mut ris = String::from("TY  - JOUR\n");
            ris.push_str(&format!("TI  - {}\n", p.title));
            for author in &p.authors {
                ris.push_str(&format!("AU  - {}\n", author));
            }
            ris.push_str(&format!("JO  - {}\n", p.journal));
            ris.push_str(&format!("PY  - {}\n", p.year));
            if let Some(doi) = &p.doi {
                ris.push_str(&format!("DO  - {}\n", doi));
            }
            if let Some(url) = &p.url {
                ris.push_str(&format!("UR  - {}\n", url));
            }
            if opts.include_abstracts {
                ris.push_str(&format!("AB  - {}\n", p.abstract_text));
            }
            ris.push_str(&format!("N1  - Study Type: {}\n", p.study_type));
            ris.push_str(&format!("N1  - Credibility Score: {}/10\n", p.credibility_score));
            ris.push_str("ER  - \n");
            ris
        })
        .collect::<Vec<_>>()
        .join("\n")
}
