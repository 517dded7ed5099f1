//! Configuration schema definitions
//!
//! Matcher tuning, the metro lookup table and logging settings.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    #[serde(default)]
    pub search: SearchConfig,

    /// Ordered metro rules; the first matching rule wins.
    #[serde(default = "default_metros")]
    pub metros: Vec<MetroRule>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ConfigSchema {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            metros: default_metros(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Fuzzy matcher tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum per-field score still counted as a match (0.0 = exact only)
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Proximity window used when location is not ignored
    #[serde(default = "default_distance")]
    pub distance: usize,

    /// Expected position of the match within a field
    #[serde(default)]
    pub location: usize,

    /// Match anywhere in the field without a proximity penalty
    #[serde(default = "default_true")]
    pub ignore_location: bool,

    /// Shortest run of matched characters that makes a field match
    #[serde(default = "default_min_match_char_length")]
    pub min_match_char_length: usize,

    /// Disable the shorter-field-weighs-more adjustment
    #[serde(default)]
    pub ignore_field_norm: bool,

    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            distance: default_distance(),
            location: 0,
            ignore_location: true,
            min_match_char_length: default_min_match_char_length(),
            ignore_field_norm: false,
            weights: WeightsConfig::default(),
        }
    }
}

fn default_threshold() -> f64 {
    0.32
}

fn default_distance() -> usize {
    100
}

fn default_min_match_char_length() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Relative importance of each searchable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_position_weight")]
    pub position: f64,
    #[serde(default = "default_company_weight")]
    pub company: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            position: default_position_weight(),
            company: default_company_weight(),
            location: default_location_weight(),
        }
    }
}

fn default_position_weight() -> f64 {
    0.6
}

fn default_company_weight() -> f64 {
    0.3
}

fn default_location_weight() -> f64 {
    0.1
}

/// One entry of the metro lookup table.
///
/// `keywords` match as plain substrings of the normalized location,
/// `patterns` as case-insensitive regular expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetroRule {
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl MetroRule {
    fn new(label: &str, keywords: &[&str], patterns: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Built-in metro table, in priority order.
pub fn default_metros() -> Vec<MetroRule> {
    vec![
        MetroRule::new(
            "remote",
            &[],
            &[r"\b(remote|wfh|work from home|distributed)\b"],
        ),
        MetroRule::new(
            "new york",
            &[
                "new york",
                "nyc",
                "brooklyn",
                "staten island",
                "long island city",
                "jersey city",
                "hoboken",
            ],
            &[
                r"\b(queens|bronx)\b",
                // "Manhattan, KS" and "Manhattan Beach" are elsewhere
                r"\bmanhattan(\s*,\s*(ny|new york|usa))?$",
            ],
        ),
        MetroRule::new(
            "san francisco",
            &[
                "san francisco",
                "bay area",
                "palo alto",
                "mountain view",
                "menlo park",
                "redwood city",
                "san mateo",
                "sunnyvale",
                "cupertino",
                "santa clara",
                "san jose",
                "oakland",
                "berkeley",
                "emeryville",
            ],
            &[r"\bsf\b"],
        ),
        MetroRule::new(
            "toronto",
            &[],
            &[r"\b(toronto|gta|scarborough|etobicoke|north york|mississauga|markham|vaughan)\b"],
        ),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
