//! Approximate substring matching.
//!
//! Scores follow the Bitap convention: `0.0` is a perfect match and `1.0` is
//! no match at all. The score of a field is the number of edits needed to
//! turn the pattern into the closest substring of the text, divided by the
//! pattern length, plus an optional proximity penalty.
//!
//! Patterns longer than [`MAX_PATTERN_LEN`] characters are split into chunks
//! that are matched independently; the field score is the mean chunk score,
//! with `1.0` for a chunk that does not match.

use crate::matcher::MatchOptions;
use serde::{Deserialize, Serialize};

/// Lowest score a non-identical match can have.
pub const MIN_SCORE: f64 = 0.001;

/// Longest pattern chunk matched in one pass.
pub const MAX_PATTERN_LEN: usize = 32;

/// Result of matching a pattern against one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Bitap-style score (lower is better)
    pub score: f64,
    /// Edits between the pattern and the matched substrings
    pub errors: usize,
    /// Inclusive character ranges of exactly matched runs
    pub indices: Vec<(usize, usize)>,
}

/// A query prepared once and matched against many fields.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    chunks: Vec<Vec<char>>,
}

/// Best alignment of one chunk.
struct ChunkHit {
    score: f64,
    errors: usize,
    matched: Vec<usize>,
}

impl Pattern {
    /// Split `pattern` into chunks of at most [`MAX_PATTERN_LEN`] characters.
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let chunks = chars.chunks(MAX_PATTERN_LEN).map(<[char]>::to_vec).collect();
        Self {
            text: pattern.to_string(),
            chunks,
        }
    }

    /// The pattern text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True for an empty pattern, which never matches.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of chunks the pattern is matched in.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Match this pattern anywhere inside `text`.
    ///
    /// Same contract as [`approximate_match`]. Matching stops as soon as the
    /// chunks seen so far already push the mean score over the threshold.
    pub fn match_text(&self, text: &str, options: &MatchOptions) -> Option<FieldMatch> {
        if self.is_empty() || text.is_empty() {
            return None;
        }

        if self.text == text {
            let len = text.chars().count();
            return Some(FieldMatch {
                score: 0.0,
                errors: 0,
                indices: vec![(0, len - 1)],
            });
        }

        let t: Vec<char> = text.chars().collect();
        let count = self.chunks.len() as f64;
        let mut total = 0.0;
        let mut errors = 0;
        let mut matched = Vec::new();

        for chunk in &self.chunks {
            match match_chunk(chunk, &t, options) {
                Some(hit) => {
                    total += hit.score;
                    errors += hit.errors;
                    matched.extend(hit.matched);
                }
                None => {
                    total += 1.0;
                    errors += chunk.len();
                }
            }
            if total / count > options.threshold {
                return None;
            }
        }

        let score = (total / count).max(MIN_SCORE);
        if score > options.threshold {
            return None;
        }

        matched.sort_unstable();
        matched.dedup();
        let indices = matched_runs(&matched, options.min_match_char_length);
        if indices.is_empty() {
            return None;
        }

        Some(FieldMatch {
            score,
            errors,
            indices,
        })
    }
}

/// Match `pattern` anywhere inside `text`.
///
/// Both strings are compared as-is; callers normalize them first. Returns
/// `None` when the best score is above `options.threshold` or when no run of
/// matched characters reaches `options.min_match_char_length`. When matching
/// one query against many fields, build a [`Pattern`] once instead.
///
/// # Example
/// ```
/// use jobboard_search::{approximate_match, MatchOptions};
///
/// let opts = MatchOptions::default();
/// let m = approximate_match("enginer", "software engineer", &opts).unwrap();
/// assert_eq!(m.errors, 1);
/// assert!(approximate_match("manager", "software engineer", &opts).is_none());
/// ```
pub fn approximate_match(
    pattern: &str,
    text: &str,
    options: &MatchOptions,
) -> Option<FieldMatch> {
    Pattern::new(pattern).match_text(text, options)
}

fn match_chunk(p: &[char], t: &[char], options: &MatchOptions) -> Option<ChunkHit> {
    let m = p.len();
    let max_errors = (options.threshold * m as f64).floor() as usize;
    // Any substring of `t` is at least `m - t.len()` edits away.
    if m > t.len() + max_errors {
        return None;
    }

    let (errors_at, starts) = last_row(p, t);

    // Without a proximity term only the error count matters, so the first end
    // with the lowest count wins.
    let mut best: Option<(f64, usize)> = None;
    for (end, &errors) in errors_at.iter().enumerate() {
        if errors > max_errors {
            continue;
        }
        let score = score_alignment(errors, starts[end], m, options);
        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, end));
        }
    }
    let (score, end) = best?;

    // The alignment lies inside `t[start..end]`, so only that window needs
    // the full matrix for the traceback.
    let start = starts[end];
    let window = &t[start..end];
    let dist = edit_matrix(p, window);
    let matched: Vec<usize> = trace_back(&dist, p, window, window.len())
        .into_iter()
        .map(|pos| pos + start)
        .collect();

    if matched_runs(&matched, options.min_match_char_length).is_empty() {
        return None;
    }

    Some(ChunkHit {
        score,
        errors: errors_at[end],
        matched,
    })
}

/// Last row of Sellers' edit matrix, computed with two rows.
///
/// Returns the fewest edits for an alignment ending at each text position and
/// where that alignment starts. Ties prefer a substitution, then a deletion
/// from the pattern, then an insertion, the same order [`trace_back`] walks.
fn last_row(p: &[char], t: &[char]) -> (Vec<usize>, Vec<usize>) {
    let n = t.len();
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];
    let mut prev_start: Vec<usize> = (0..=n).collect();
    let mut curr_start = vec![0usize; n + 1];

    for (i, &pc) in p.iter().enumerate() {
        curr[0] = i + 1;
        curr_start[0] = 0;
        for j in 1..=n {
            let diag = prev[j - 1] + usize::from(pc != t[j - 1]);
            let up = prev[j] + 1;
            let left = curr[j - 1] + 1;
            let best = diag.min(up).min(left);

            curr[j] = best;
            curr_start[j] = if best == diag {
                prev_start[j - 1]
            } else if best == up {
                prev_start[j]
            } else {
                curr_start[j - 1]
            };
        }
        std::mem::swap(&mut prev, &mut curr);
        std::mem::swap(&mut prev_start, &mut curr_start);
    }

    (prev, prev_start)
}

/// Sellers' edit matrix: row 0 is all zeros so a match may start anywhere.
///
/// Stored row-major as `(m + 1) * (n + 1)` cells.
fn edit_matrix(p: &[char], t: &[char]) -> Vec<usize> {
    let m = p.len();
    let n = t.len();
    let width = n + 1;
    let mut d = vec![0usize; (m + 1) * width];

    for i in 1..=m {
        d[i * width] = i;
        for j in 1..=n {
            let cost = if p[i - 1] == t[j - 1] { 0 } else { 1 };
            d[i * width + j] = (d[(i - 1) * width + j - 1] + cost)
                .min(d[(i - 1) * width + j] + 1)
                .min(d[i * width + j - 1] + 1);
        }
    }

    d
}

/// Text positions of exactly matched characters on the alignment ending at `end`.
fn trace_back(d: &[usize], p: &[char], t: &[char], end: usize) -> Vec<usize> {
    let width = t.len() + 1;
    let mut i = p.len();
    let mut j = end;
    let mut matched = Vec::new();

    while i > 0 && j > 0 {
        let here = d[i * width + j];
        let same = p[i - 1] == t[j - 1];
        let diag = d[(i - 1) * width + j - 1] + usize::from(!same);

        if here == diag {
            if same {
                matched.push(j - 1);
            }
            i -= 1;
            j -= 1;
        } else if here == d[(i - 1) * width + j] + 1 {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    matched.reverse();
    matched
}

fn score_alignment(errors: usize, start: usize, pattern_len: usize, options: &MatchOptions) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if options.ignore_location {
        return accuracy;
    }

    let proximity = start.abs_diff(options.location);
    if options.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }
    accuracy + proximity as f64 / options.distance as f64
}

/// Collapse matched positions into runs, dropping runs shorter than `min_len`.
fn matched_runs(positions: &[usize], min_len: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut iter = positions.iter().copied();
    let Some(first) = iter.next() else {
        return runs;
    };

    let (mut start, mut prev) = (first, first);
    for pos in iter {
        if pos != prev + 1 {
            runs.push((start, prev));
            start = pos;
        }
        prev = pos;
    }
    runs.push((start, prev));

    runs.retain(|(s, e)| e - s + 1 >= min_len.max(1));
    runs
}
