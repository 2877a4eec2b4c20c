use chrono::{DateTime, Duration, Utc};

use super::models::{Account, Lead, Project};
use super::rules::{ClassifierRules, STALE_EMAIL_MARKER, STALE_NAME_MARKERS};

/// The text fields a record exposes for classification, computed once per
/// record. Name-like fields are concatenated and lowercased; email is
/// lowercased; phone is kept raw because phone formats are rigid.
#[derive(Debug, Clone, Default)]
pub struct TextProfile {
    pub name_text: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

fn join_lowercase(fields: &[Option<&str>]) -> String {
    fields
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Record kinds the classifier can inspect directly. Conversations carry no
/// name-like fields and are only ever included relationally.
pub trait Classifiable {
    fn text_profile(&self) -> TextProfile;
}

impl Classifiable for Account {
    fn text_profile(&self) -> TextProfile {
        TextProfile {
            name_text: join_lowercase(&[Some(&self.name)]),
            email: self.email.as_ref().map(|e| e.to_lowercase()),
            phone: self.phone.clone(),
            created_at: self.created_at,
        }
    }
}

impl Classifiable for Project {
    fn text_profile(&self) -> TextProfile {
        TextProfile {
            name_text: join_lowercase(&[Some(&self.name), self.description.as_deref()]),
            email: None,
            phone: None,
            created_at: self.created_at,
        }
    }
}

impl Classifiable for Lead {
    fn text_profile(&self) -> TextProfile {
        TextProfile {
            name_text: join_lowercase(&[self.first_name.as_deref(), self.last_name.as_deref()]),
            email: self.email.as_ref().map(|e| e.to_lowercase()),
            phone: self.phone.clone(),
            created_at: self.created_at,
        }
    }
}

/// Decide whether a record is test data.
///
/// Two tiers: explicit pattern matches are unconditional; records older than
/// the age threshold are additionally checked against the narrower stale
/// marker set. `now` is an argument so the verdict is a pure function of its
/// inputs. A record with no creation timestamp is never classified by
/// staleness.
pub fn classify(profile: &TextProfile, rules: &ClassifierRules, now: DateTime<Utc>) -> bool {
    if rules
        .name_patterns
        .iter()
        .any(|p| profile.name_text.contains(&p.to_lowercase()))
    {
        return true;
    }

    if let Some(email) = &profile.email {
        if rules
            .email_patterns
            .iter()
            .any(|p| email.contains(&p.to_lowercase()))
        {
            return true;
        }
    }

    if let Some(phone) = &profile.phone {
        if rules.phone_patterns.iter().any(|p| phone.contains(p.as_str())) {
            return true;
        }
    }

    let Some(created_at) = profile.created_at else {
        return false;
    };
    // An out-of-range threshold (e.g. the patterns_only sentinel) disables
    // the stale tier entirely.
    let Some(threshold) = Duration::try_days(rules.age_threshold_days) else {
        return false;
    };
    if now.signed_duration_since(created_at) <= threshold {
        return false;
    }

    looks_stale(profile)
}

fn looks_stale(profile: &TextProfile) -> bool {
    if STALE_NAME_MARKERS
        .iter()
        .any(|m| profile.name_text.contains(m))
    {
        return true;
    }
    match &profile.email {
        Some(email) => {
            email.contains(STALE_EMAIL_MARKER)
                || STALE_NAME_MARKERS.iter().any(|m| email.contains(m))
        }
        None => false,
    }
}
