//! Fuzzy job search for the job board.
//!
//! This crate provides:
//! - Text and location normalization with a configurable metro table
//! - Projection of raw job records into search-ready records
//! - Approximate substring matching with Bitap-style scores
//! - A weighted multi-field search index and a snapshot cache for it
//!
//! # Example
//!
//! ```
//! use jobboard_search::{search_jobs, MatchOptions, RawJob};
//!
//! let jobs = vec![
//!     RawJob::new("Software Engineer", "Acme", Some("Brooklyn, NY")),
//!     RawJob::new("Product Manager", "Globex", Some("Remote")),
//! ];
//!
//! let results = search_jobs(&jobs, "softwre enginer", &MatchOptions::default()).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].item.location_n, "new york");
//! ```

mod cache;
mod error;
mod fuzzy;
mod job;
mod matcher;
mod normalize;

#[cfg(feature = "wasm")]
mod wasm;

pub use cache::IndexCache;
pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::{approximate_match, FieldMatch, Pattern, MAX_PATTERN_LEN, MIN_SCORE};
pub use job::{
    normalize_job, normalize_job_with, normalize_jobs, JobField, JobRecord, NormalizedJob, RawJob,
};
pub use matcher::{search_jobs, search_jobs_json, FieldHit, FieldWeights, MatchOptions, SearchIndex};
pub use normalize::{normalize_location, normalize_text, MetroTable};

/// Search result with match score.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResult<T> {
    /// The matched item
    pub item: T,
    /// Match score (lower is better, 0.0 is perfect)
    pub score: f64,
    /// Fields that matched, in weight order
    pub matches: Vec<FieldHit>,
}

impl<T> SearchResult<T> {
    /// Transform the item, keeping score and matches.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SearchResult<U> {
        SearchResult {
            item: f(self.item),
            score: self.score,
            matches: self.matches,
        }
    }
}
