use serde::{Deserialize, Serialize};

use crate::sweep::rules::ClassifierRules;
use crate::DEFAULT_DATASTORE_URL;

/// Runtime configuration for a sweep: where the datastore lives, how to
/// authenticate against it, and which classification rules to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadsweepConfig {
    pub url: String,
    pub service_key: Option<String>,
    pub rules: ClassifierRules,
}

impl LeadsweepConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            service_key: None,
            rules: ClassifierRules::default(),
        }
    }

    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized: `LEADSWEEP_URL`, `LEADSWEEP_SERVICE_KEY`,
    /// `LEADSWEEP_AGE_DAYS`.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            &std::env::var("LEADSWEEP_URL").unwrap_or_else(|_| DEFAULT_DATASTORE_URL.to_string()),
        );

        if let Ok(key) = std::env::var("LEADSWEEP_SERVICE_KEY") {
            config.service_key = Some(key);
        }
        if let Ok(days) = std::env::var("LEADSWEEP_AGE_DAYS") {
            if let Ok(days) = days.parse() {
                config.rules.age_threshold_days = days;
            }
        }

        config
    }
}

impl Default for LeadsweepConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATASTORE_URL)
    }
}
