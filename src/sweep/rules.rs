use serde::{Deserialize, Serialize};

/// Name-like substrings that mark a record as test data on their own.
pub const DEFAULT_NAME_PATTERNS: &[&str] = &[
    "test", "demo", "sample", "prueba", "ejemplo", "fake", "dummy", "asdf", "qwerty", "zzz",
];

pub const DEFAULT_EMAIL_PATTERNS: &[&str] = &["test", "demo", "sample", "example.", "mailinator"];

/// Matched case-sensitively against the raw phone field.
pub const DEFAULT_PHONE_PATTERNS: &[&str] = &["+0000", "000000", "123456", "555555"];

/// Narrower marker set for the age-gated tier: a record old enough to be
/// stale must also carry one of these in its name text, or `example` in its
/// email, before it is treated as forgotten test data.
pub const STALE_NAME_MARKERS: &[&str] = &["test", "demo", "sample"];

pub const STALE_EMAIL_MARKER: &str = "example";

fn default_name_patterns() -> Vec<String> {
    DEFAULT_NAME_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_email_patterns() -> Vec<String> {
    DEFAULT_EMAIL_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_phone_patterns() -> Vec<String> {
    DEFAULT_PHONE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_age_threshold_days() -> i64 {
    30
}

/// Externalized classification rule set.
///
/// Empty pattern lists are valid and simply match nothing; age alone is never
/// sufficient to classify a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    #[serde(default = "default_name_patterns")]
    pub name_patterns: Vec<String>,

    #[serde(default = "default_email_patterns")]
    pub email_patterns: Vec<String>,

    #[serde(default = "default_phone_patterns")]
    pub phone_patterns: Vec<String>,

    /// Minimum age before the stale-marker tier applies.
    #[serde(default = "default_age_threshold_days")]
    pub age_threshold_days: i64,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            name_patterns: default_name_patterns(),
            email_patterns: default_email_patterns(),
            phone_patterns: default_phone_patterns(),
            age_threshold_days: default_age_threshold_days(),
        }
    }
}

impl ClassifierRules {
    /// Rules that classify by explicit pattern only, with the age-gated tier
    /// pushed out of reach.
    pub fn patterns_only() -> Self {
        Self {
            age_threshold_days: i64::MAX,
            ..Default::default()
        }
    }

    pub fn with_age_threshold(mut self, days: i64) -> Self {
        self.age_threshold_days = days;
        self
    }
}
