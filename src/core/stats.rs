//! Summary statistics over a set of incidents

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::incident::{Incident, Phase, Severity, Status, Tag};

/// Counts grouped by phase, severity, status and category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    /// Every phase, zero when unused
    pub by_phase: BTreeMap<Phase, usize>,
    /// Every severity, zero when unused
    pub by_severity: BTreeMap<Severity, usize>,
    /// Every status, zero when unused
    pub by_status: BTreeMap<Status, usize>,
    /// Only categories that occur
    pub by_category: BTreeMap<String, usize>,
    /// Status other than closed
    pub open_count: usize,
    pub closed_count: usize,
}

fn zeroed<T: Tag + Ord>() -> BTreeMap<T, usize> {
    T::ALL.iter().map(|t| (*t, 0)).collect()
}

/// Aggregate `incidents`; a pure read
pub fn summarize<'a, I>(incidents: I) -> Summary
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut summary = Summary {
        total: 0,
        by_phase: zeroed(),
        by_severity: zeroed(),
        by_status: zeroed(),
        by_category: BTreeMap::new(),
        open_count: 0,
        closed_count: 0,
    };

    for incident in incidents {
        summary.total += 1;
        *summary.by_phase.entry(incident.phase).or_default() += 1;
        *summary.by_severity.entry(incident.severity).or_default() += 1;
        *summary.by_status.entry(incident.status).or_default() += 1;
        *summary
            .by_category
            .entry(incident.category.to_string())
            .or_default() += 1;

        if incident.status.is_closed() {
            summary.closed_count += 1;
        } else {
            summary.open_count += 1;
        }
    }

    summary
}

impl Summary {
    /// Share of incidents still open, as a percentage
    pub fn open_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.open_count as f64 * 100.0 / self.total as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::IncidentId;
    use crate::entities::incident::{now, validate_and_normalize, IncidentDraft};

    fn incident(severity: &str, phase: &str, status: Status) -> Incident {
        let draft = IncidentDraft::new("x")
            .with_severity(severity)
            .with_phase(phase)
            .with_category("malware");
        let mut incident = validate_and_normalize(&draft)
            .unwrap()
            .into_incident(IncidentId::new(), now());
        incident.status = status;
        incident
    }

    #[test]
    fn test_empty_collection_has_every_key() {
        let none: Vec<Incident> = Vec::new();
        let summary = summarize(&none);
        assert_eq!(summary.total, 0);
        assert!(summary.is_empty());
        assert_eq!(summary.by_phase.len(), Phase::ALL.len());
        assert_eq!(summary.by_severity.len(), Severity::ALL.len());
        assert_eq!(summary.by_status.len(), Status::ALL.len());
        assert!(summary.by_phase.values().all(|&n| n == 0));
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.open_pct(), 0.0);
    }

    #[test]
    fn test_counts_add_up() {
        let incidents = vec![
            incident("high", "detect", Status::Open),
            incident("high", "contain", Status::Contained),
            incident("low", "recover", Status::Closed),
            incident("critical", "contain", Status::InProgress),
        ];
        let summary = summarize(&incidents);

        assert_eq!(summary.total, incidents.len());
        assert!(!summary.is_empty());
        assert_eq!(summary.by_status.values().sum::<usize>(), summary.total);
        assert_eq!(summary.by_phase.values().sum::<usize>(), summary.total);
        assert_eq!(summary.by_severity[&Severity::High], 2);
        assert_eq!(summary.by_severity[&Severity::Medium], 0);
        assert_eq!(summary.by_phase[&Phase::Contain], 2);
        assert_eq!(summary.by_phase[&Phase::LessonsLearned], 0);
        assert_eq!(summary.by_category["malware"], 4);
        assert_eq!(summary.open_count, 3);
        assert_eq!(summary.closed_count, 1);
        assert_eq!(summary.open_pct(), 75.0);
    }

    #[test]
    fn test_keys_follow_declaration_order() {
        let summary = summarize(&Vec::<Incident>::new());
        let phases: Vec<Phase> = summary.by_phase.keys().copied().collect();
        assert_eq!(phases, Phase::ALL.to_vec());
        let severities: Vec<Severity> = summary.by_severity.keys().copied().collect();
        assert_eq!(severities, Severity::ALL.to_vec());
    }

    #[test]
    fn test_json_uses_canonical_tags() {
        let summary = summarize(&[incident("low", "lessons learned", Status::InProgress)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["by_phase"]["lessons_learned"], 1);
        assert_eq!(json["by_status"]["in_progress"], 1);
        assert_eq!(json["by_status"]["closed"], 0);
        assert_eq!(json["open_count"], 1);
    }
}
