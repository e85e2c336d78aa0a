//! Incident filtering and optional explicit sorting
//!
//! Filtering is a stable AND of whichever predicates were supplied; output
//! keeps store insertion order unless the caller asks for a sort.

use std::cmp::Ordering;

use tracing::warn;

use crate::core::error::{Result, TrackerError};
use crate::entities::incident::{Category, Incident, Phase, Severity, Status, Tag};

/// Raw filter values as typed by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub phase: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
}

/// Validated filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub phase: Option<Phase>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    /// Lowercased; matched as a substring
    pub owner: Option<String>,
}

impl IncidentFilter {
    /// Validate raw criteria; unknown values are errors, never empty matches
    pub fn from_criteria(criteria: &FilterCriteria) -> Result<Self> {
        let owner = match criteria.owner.as_deref() {
            Some(raw) if raw.trim().is_empty() => {
                return Err(TrackerError::InvalidFilter {
                    name: "owner",
                    value: raw.to_string(),
                    expected: "a non-empty substring".to_string(),
                })
            }
            Some(raw) => Some(raw.trim().to_lowercase()),
            None => None,
        };

        Ok(Self {
            phase: criteria.phase.as_deref().map(Phase::parse_filter).transpose()?,
            severity: criteria
                .severity
                .as_deref()
                .map(Severity::parse_filter)
                .transpose()?,
            status: criteria.status.as_deref().map(Status::parse_filter).transpose()?,
            category: criteria
                .category
                .as_deref()
                .map(Category::parse_filter)
                .transpose()?,
            owner,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_lowercase());
        self
    }

    /// Does `incident` satisfy every supplied predicate?
    pub fn matches(&self, incident: &Incident) -> bool {
        self.phase.map_or(true, |p| incident.phase == p)
            && self.severity.map_or(true, |s| incident.severity == s)
            && self.status.map_or(true, |s| incident.status == s)
            && self
                .category
                .as_ref()
                .map_or(true, |c| incident.category == *c)
            && self.owner.as_ref().map_or(true, |needle| {
                incident
                    .owner
                    .as_ref()
                    .is_some_and(|o| o.to_lowercase().contains(needle))
            })
    }

    /// The custom category being filtered on, if no incident carries it
    pub fn unmatched_custom_category<'a>(&'a self, incidents: &[Incident]) -> Option<&'a Category> {
        self.category
            .as_ref()
            .filter(|c| c.is_custom() && !incidents.iter().any(|i| i.category == **c))
    }
}

/// Filter `incidents`, preserving their order
pub fn filter<'a>(incidents: &'a [Incident], criteria: &IncidentFilter) -> Vec<&'a Incident> {
    if criteria.is_empty() {
        return incidents.iter().collect();
    }
    if let Some(category) = criteria.unmatched_custom_category(incidents) {
        warn!(
            category = %category,
            "no incident has this category; built-in ones are phishing, malware, unauthorized_access, data_leak, denial_of_service, other"
        );
    }
    incidents.iter().filter(|i| criteria.matches(i)).collect()
}

/// Explicit sort keys for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    /// Highest severity first
    Severity,
    Created,
    Updated,
    /// Lifecycle order, preparation first
    Phase,
    Status,
    Title,
}

fn compare(key: SortKey, a: &Incident, b: &Incident) -> Ordering {
    match key {
        SortKey::Severity => b.severity.cmp(&a.severity),
        SortKey::Created => a.created_at.cmp(&b.created_at),
        SortKey::Updated => a.updated_at.cmp(&b.updated_at),
        SortKey::Phase => a.phase.cmp(&b.phase),
        SortKey::Status => a.status.cmp(&b.status),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// Stable sort; ties keep insertion order
pub fn sort(incidents: &mut [&Incident], key: SortKey, reverse: bool) {
    incidents.sort_by(|a, b| {
        let ord = compare(key, a, b);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
}
