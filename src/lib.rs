//! Sage - keyword-matched product guide
//!
//! Answers product questions for a small dispensary menu with:
//! - Keyword intent classification (sleep, energy, pain, anxiety, beginner)
//! - Additive match scoring over a static catalog
//! - Canned explanations and mock research summaries
//! - A browsable, exportable research library

pub mod types;
pub mod catalog;
pub mod config;
pub mod error;
pub mod intent;
pub mod scoring;
pub mod explanation;
pub mod research;
pub mod library;
pub mod export;
pub mod sage_engine;
pub mod server;

pub use types::*;
pub use catalog::Catalog;
pub use config::{Config, MatchStrategy};
pub use error::SageError;
pub use intent::IntentCategory;
pub use research::ResearchCorpus;
pub use sage_engine::{SageEngine, SharedSageEngine};
