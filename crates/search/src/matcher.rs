//! Weighted multi-field job search.
//!
//! A [`SearchIndex`] holds projected jobs and their precomputed field norms.
//! Each query is matched against `positionN`, `companyN` and `locationN`
//! with a [`Pattern`](crate::Pattern) prepared once per query; the per-field scores
//! are folded into one document score with a weighted product, so a strong
//! hit on a heavy field beats the same hit on a light one.

use crate::error::{Result, SearchError};
use crate::fuzzy::{FieldMatch, Pattern};
use crate::job::{normalize_jobs, JobField, JobRecord, NormalizedJob, RawJob};
use crate::normalize::{normalize_text, MetroTable};
use crate::SearchResult;
use jobboard_core::config::{SearchConfig, WeightsConfig};
use serde::{Deserialize, Serialize};

/// Relative importance of the searchable fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    /// Weight of `positionN`
    pub position: f64,
    /// Weight of `companyN`
    pub company: f64,
    /// Weight of `locationN`
    pub location: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            position: 0.6,
            company: 0.3,
            location: 0.1,
        }
    }
}

impl FieldWeights {
    /// Weight of a single field.
    pub fn get(&self, field: JobField) -> f64 {
        match field {
            JobField::Position => self.position,
            JobField::Company => self.company,
            JobField::Location => self.location,
        }
    }

    /// Weights scaled to sum to 1.0.
    pub fn normalized(&self) -> Self {
        let total = self.position + self.company + self.location;
        if total <= 0.0 {
            return *self;
        }
        Self {
            position: self.position / total,
            company: self.company / total,
            location: self.location / total,
        }
    }

    fn validate(&self) -> Result<()> {
        let values = [self.position, self.company, self.location];
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SearchError::InvalidOptions(
                "field weights must be non-negative".into(),
            ));
        }
        if values.iter().sum::<f64>() <= 0.0 {
            return Err(SearchError::InvalidOptions(
                "at least one field weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl From<&WeightsConfig> for FieldWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            position: config.position,
            company: config.company,
            location: config.location,
        }
    }
}

/// Matcher tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Maximum per-field score still counted as a match (0.0 = exact only)
    pub threshold: f64,
    /// Proximity window used when `ignore_location` is false
    pub distance: usize,
    /// Expected position of the match within a field
    pub location: usize,
    /// Match anywhere without a proximity penalty
    pub ignore_location: bool,
    /// Shortest run of matched characters that makes a field match
    pub min_match_char_length: usize,
    /// Disable the shorter-field-weighs-more adjustment
    pub ignore_field_norm: bool,
    /// Field weights
    pub weights: FieldWeights,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.32,
            distance: 100,
            location: 0,
            ignore_location: true,
            min_match_char_length: 2,
            ignore_field_norm: false,
            weights: FieldWeights::default(),
        }
    }
}

impl MatchOptions {
    /// Check ranges; called by [`SearchIndex::new`].
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidOptions(format!(
                "threshold must be between 0 and 1, got {}",
                self.threshold
            )));
        }
        self.weights.validate()
    }
}

impl From<&SearchConfig> for MatchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            threshold: config.threshold,
            distance: config.distance,
            location: config.location,
            ignore_location: config.ignore_location,
            min_match_char_length: config.min_match_char_length,
            ignore_field_norm: config.ignore_field_norm,
            weights: FieldWeights::from(&config.weights),
        }
    }
}

/// One field that contributed to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldHit {
    /// Which field matched
    pub field: JobField,
    /// Field score (lower is better)
    pub score: f64,
    /// Inclusive character ranges of the matched runs
    pub indices: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
struct IndexedJob<J> {
    job: NormalizedJob<J>,
    norms: [f64; 3],
}

/// Searchable snapshot of a job list.
///
/// Immutable once built, so one index can serve concurrent queries.
#[derive(Debug, Clone)]
pub struct SearchIndex<J> {
    jobs: Vec<IndexedJob<J>>,
    options: MatchOptions,
    weights: FieldWeights,
}

impl<J: Send + Sync> SearchIndex<J> {
    /// Build an index over already projected jobs.
    pub fn new(jobs: Vec<NormalizedJob<J>>, options: MatchOptions) -> Result<Self> {
        options.validate()?;

        let jobs: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let norms = JobField::ALL.map(|f| field_norm(job.field(f)));
                IndexedJob { job, norms }
            })
            .collect();

        tracing::debug!(
            jobs = jobs.len(),
            threshold = options.threshold,
            "Search index built"
        );

        let weights = options.weights.normalized();
        Ok(Self {
            jobs,
            options,
            weights,
        })
    }

    /// Project raw jobs and index them.
    pub fn from_jobs(jobs: &[J], metros: &MetroTable, options: MatchOptions) -> Result<Self>
    where
        J: JobRecord + Clone,
    {
        Self::new(normalize_jobs(jobs, metros), options)
    }

    /// Number of indexed jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Options the index was built with.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Indexed jobs in insertion order.
    pub fn jobs(&self) -> impl Iterator<Item = &NormalizedJob<J>> {
        self.jobs.iter().map(|j| &j.job)
    }

    /// Ranked matches for `query`, best first.
    ///
    /// The query is trimmed and lower-cased. A blank query, an empty index or
    /// a query nothing matches all yield an empty list.
    pub fn search(&self, query: &str) -> Vec<SearchResult<&NormalizedJob<J>>> {
        let pattern = Pattern::new(&normalize_text(Some(query)));
        if pattern.is_empty() || self.jobs.is_empty() {
            return Vec::new();
        }

        let mut scored = self.score_all(&pattern);
        scored.sort_by(|(ia, a), (ib, b)| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        });

        tracing::debug!(
            query = %pattern.as_str(),
            chunks = pattern.chunk_count(),
            indexed = self.jobs.len(),
            matched = scored.len(),
            "Search completed"
        );

        scored.into_iter().map(|(_, result)| result).collect()
    }

    /// Like [`search`](Self::search) but keeps at most `limit` results.
    pub fn search_with_limit(
        &self,
        query: &str,
        limit: usize,
    ) -> Vec<SearchResult<&NormalizedJob<J>>> {
        let mut results = self.search(query);
        results.truncate(limit);
        results
    }

    fn score_all(&self, pattern: &Pattern) -> Vec<(usize, SearchResult<&NormalizedJob<J>>)> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.jobs
                .par_iter()
                .enumerate()
                .filter_map(|(idx, indexed)| self.score_job(pattern, indexed).map(|r| (idx, r)))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.jobs
                .iter()
                .enumerate()
                .filter_map(|(idx, indexed)| self.score_job(pattern, indexed).map(|r| (idx, r)))
                .collect()
        }
    }

    fn score_job<'a>(
        &self,
        pattern: &Pattern,
        indexed: &'a IndexedJob<J>,
    ) -> Option<SearchResult<&'a NormalizedJob<J>>> {
        let mut total = 1.0;
        let mut matches = Vec::new();

        for (slot, field) in JobField::ALL.into_iter().enumerate() {
            let weight = self.weights.get(field);
            if weight <= 0.0 {
                continue;
            }

            let Some(FieldMatch { score, indices, .. }) =
                pattern.match_text(indexed.job.field(field), &self.options)
            else {
                continue;
            };

            let base = if score == 0.0 { f64::EPSILON } else { score };
            let norm = if self.options.ignore_field_norm {
                1.0
            } else {
                indexed.norms[slot]
            };
            total *= base.powf(weight * norm);

            matches.push(FieldHit {
                field,
                score,
                indices,
            });
        }

        if matches.is_empty() {
            return None;
        }

        Some(SearchResult {
            item: &indexed.job,
            score: total,
            matches,
        })
    }
}

/// Project, index and query in one call.
///
/// Convenient for one-off searches; keep a [`SearchIndex`] (or an
/// [`IndexCache`](crate::IndexCache)) around when the job list is queried
/// repeatedly.
pub fn search_jobs<J>(
    jobs: &[J],
    query: &str,
    options: &MatchOptions,
) -> Result<Vec<SearchResult<NormalizedJob<J>>>>
where
    J: JobRecord + Clone + Send + Sync,
{
    let index = SearchIndex::from_jobs(jobs, MetroTable::builtin(), options.clone())?;
    Ok(index
        .search(query)
        .into_iter()
        .map(|r| r.map(Clone::clone))
        .collect())
}

/// JSON in, JSON out form of [`search_jobs`] with default options.
///
/// `jobs_json` is an array of [`RawJob`] objects; the result is the ranked
/// list serialized as a JSON array. A `limit` of 0 keeps every result.
pub fn search_jobs_json(query: &str, jobs_json: &str, limit: usize) -> Result<String> {
    let jobs: Vec<RawJob> = serde_json::from_str(jobs_json)?;
    let mut results = search_jobs(&jobs, query, &MatchOptions::default())?;
    if limit > 0 {
        results.truncate(limit);
    }
    Ok(serde_json::to_string(&results)?)
}

/// `1 / sqrt(word count)`, rounded to three decimals.
fn field_norm(text: &str) -> f64 {
    let tokens = text.split(' ').filter(|t| !t.is_empty()).count();
    if tokens == 0 {
        return 1.0;
    }
    (1000.0 / (tokens as f64).sqrt()).round() / 1000.0
}
