//! Ordered keyword rules mapping statement descriptions to spending
//! categories, plus the patterns that mark unsigned amounts as money in.
//!
//! The table is data: it ships with a built-in default and can be replaced
//! by a TOML file of the form
//!
//! ```toml
//! inflow_patterns = ["received", "deposit"]
//!
//! [[rule]]
//! category = "BETTING"
//! patterns = ['\bbets?\b', "sportpesa"]
//! ```
//!
//! Patterns are case-insensitive regular expressions. Rules are tried in
//! file order and the first match wins; no match means `OTHER`.

use hazina_core::{Category, Direction};
use hazina_ingest::AmountSign;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("reading rule file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing rule table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serializing rule table: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid pattern {pattern:?} in {scope} rule: {source}")]
    InvalidPattern {
        scope: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("empty pattern in {0} rule")]
    EmptyPattern(String),
}

/// One category and the patterns that select it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub patterns: Vec<String>,
}

/// Serializable form of the rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub inflow_patterns: Vec<String>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<CategoryRule>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        fn rule(category: Category, patterns: &[&str]) -> CategoryRule {
            CategoryRule {
                category,
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
            }
        }

        Self {
            inflow_patterns: [
                "received",
                "deposit",
                r"paid in",
                "reversal",
                r"business payment from",
                "salary",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            rules: vec![
                rule(
                    Category::Betting,
                    &[
                        r"\bbets?\b",
                        r"\bbetting\b",
                        "sportpesa",
                        "betway",
                        "betika",
                        "odibets",
                        "mozzart",
                        r"\bodds\b",
                        "gaming",
                    ],
                ),
                rule(Category::Airtime, &["airtime", r"top[- ]?up", r"\bbundles?\b"]),
                rule(Category::FulizaMshwari, &["fuliza", r"m-?shwari"]),
                rule(
                    Category::BarsRestaurants,
                    &[
                        r"\bbar\b",
                        r"\bpub\b",
                        r"\bclub\b",
                        "restaurant",
                        "hotel",
                        "lounge",
                        r"\bgrill\b",
                    ],
                ),
                rule(
                    Category::TillWithdrawal,
                    &[r"\btill\b", r"pay ?bill", r"buy goods", "withdraw", r"\bagent\b"],
                ),
            ],
        }
    }
}

/// Compiled rule table
#[derive(Debug, Clone)]
pub struct RuleTable {
    config: RuleConfig,
    matchers: Vec<(Regex, Category)>,
    inflow: Vec<Regex>,
}

impl RuleTable {
    /// The built-in table
    pub fn builtin() -> Result<Self, RuleError> {
        Self::from_config(RuleConfig::default())
    }

    pub fn from_config(config: RuleConfig) -> Result<Self, RuleError> {
        let mut matchers = Vec::new();
        for rule in &config.rules {
            for pattern in &rule.patterns {
                matchers.push((compile(rule.category.as_str(), pattern)?, rule.category));
            }
        }

        let inflow = config
            .inflow_patterns
            .iter()
            .map(|p| compile("inflow", p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            matchers,
            inflow,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RuleError> {
        let config: RuleConfig = toml::from_str(s)?;
        Self::from_config(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn to_toml_string(&self) -> Result<String, RuleError> {
        Ok(toml::to_string_pretty(&self.config)?)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// First matching category in table order, `Other` when nothing matches
    pub fn categorize(&self, description: &str) -> Category {
        for (re, category) in &self.matchers {
            if re.is_match(description) {
                debug!(description, pattern = re.as_str(), %category, "rule matched");
                return *category;
            }
        }
        Category::Other
    }

    pub fn is_inflow_description(&self, description: &str) -> bool {
        self.inflow.iter().any(|re| re.is_match(description))
    }

    /// Explicit signs decide; unsigned amounts are money in only when the
    /// description says so
    pub fn direction(&self, sign: AmountSign, description: &str) -> Direction {
        match sign {
            AmountSign::Debit => Direction::Outflow,
            AmountSign::Credit => Direction::Inflow,
            AmountSign::Unsigned if self.is_inflow_description(description) => Direction::Inflow,
            AmountSign::Unsigned => Direction::Outflow,
        }
    }
}

fn compile(scope: &str, pattern: &str) -> Result<Regex, RuleError> {
    if pattern.trim().is_empty() {
        return Err(RuleError::EmptyPattern(scope.to_string()));
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            scope: scope.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}
