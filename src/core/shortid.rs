//! Short ids for easier incident selection
//!
//! `irt list` hands out numeric aliases (`@1`, `@2`, ...) in listing order and
//! remembers them in a small JSON file next to the store, so the next command
//! can say `irt update @2 --status contained`. The aliases are rebuilt on
//! every listing; the real `INC-` ids never change.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{Result, TrackerError};
use crate::core::identity::IncidentId;
use crate::entities::incident::Incident;

/// A mapping of short ids (@N) to full incident ids
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    entries: HashMap<u32, String>,
    #[serde(skip)]
    reverse: HashMap<String, u32>,
    next_id: u32,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Index file that belongs to a store: `incidents.yaml` → `incidents.shortids.json`
    pub fn path_for(store_path: &Path) -> PathBuf {
        let stem = store_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "incidents".to_string());
        store_path.with_file_name(format!("{}.shortids.json", stem))
    }

    /// Load the index for a store, or start empty if there is none yet
    pub fn load(store_path: &Path) -> Self {
        let path = Self::path_for(store_path);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::new();
        };
        match serde_json::from_str::<ShortIdIndex>(&content) {
            Ok(mut index) => {
                index.reverse = index.entries.iter().map(|(k, v)| (v.clone(), *k)).collect();
                index
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable short id index");
                Self::new()
            }
        }
    }

    /// Persist the index; failures are logged since the aliases are only a convenience
    pub fn save(&self, store_path: &Path) {
        let path = Self::path_for(store_path);
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|content| fs::write(&path, content));
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "could not save short id index");
        }
    }

    /// Clear and rebuild the index in the given order
    pub fn rebuild(&mut self, ids: impl IntoIterator<Item = String>) {
        self.entries.clear();
        self.reverse.clear();
        self.next_id = 1;

        for id in ids {
            self.add(id);
        }
    }

    /// Add an id and return its short number (existing ids keep theirs)
    pub fn add(&mut self, id: String) -> u32 {
        if let Some(&short_id) = self.reverse.get(&id) {
            return short_id;
        }

        let short_id = self.next_id.max(1);
        self.next_id = short_id + 1;
        self.entries.insert(short_id, id.clone());
        self.reverse.insert(id, short_id);
        short_id
    }

    /// Resolve `@N` or `N` to the full id it stands for
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        let number = reference.strip_prefix('@').unwrap_or(reference);
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        number
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n))
            .map(String::as_str)
    }

    pub fn get_short_id(&self, id: &str) -> Option<u32> {
        self.reverse.get(id).copied()
    }

    /// `@N` for display, empty when the id has no alias
    pub fn display_for(&self, id: &IncidentId) -> String {
        self.get_short_id(&id.to_string())
            .map(|n| format!("@{}", n))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_short_reference(reference: &str) -> bool {
    let number = reference.strip_prefix('@').unwrap_or(reference);
    !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
}

/// Turn an operator reference into an id present in `incidents`
///
/// Accepts `@N`/`N` short ids, full `INC-…` ids in any case, and unique
/// prefixes of a full id or of its ULID part.
pub fn resolve_reference(
    reference: &str,
    index: &ShortIdIndex,
    incidents: &[Incident],
) -> Result<IncidentId> {
    let reference = reference.trim();
    let not_found = || TrackerError::NotFound(reference.to_string());

    if is_short_reference(reference) {
        if index.is_empty() {
            debug!("no short ids recorded yet; `irt list` assigns them");
        }
        let full = index.resolve(reference).ok_or_else(not_found)?;
        let id = IncidentId::parse(full).map_err(|_| not_found())?;
        return incidents
            .iter()
            .any(|i| i.id == id)
            .then_some(id)
            .ok_or_else(not_found);
    }

    if let Ok(id) = IncidentId::parse(reference) {
        return incidents
            .iter()
            .any(|i| i.id == id)
            .then_some(id)
            .ok_or_else(not_found);
    }

    let needle = reference.to_uppercase();
    if needle.is_empty() {
        return Err(not_found());
    }
    let matches: Vec<IncidentId> = incidents
        .iter()
        .map(|i| i.id)
        .filter(|id| {
            let full = id.to_string();
            full.starts_with(&needle) || id.ulid().to_string().starts_with(&needle)
        })
        .collect();

    match matches.as_slice() {
        [] => Err(not_found()),
        [id] => Ok(*id),
        many => Err(TrackerError::AmbiguousId {
            reference: reference.to_string(),
            matches: many.iter().map(|id| id.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::incident::{now, validate_and_normalize, IncidentDraft};
    use tempfile::tempdir;
    use ulid::Ulid;

    fn incident_with(ulid: &str) -> Incident {
        validate_and_normalize(&IncidentDraft::new("x"))
            .unwrap()
            .into_incident(IncidentId::from_ulid(Ulid::from_string(ulid).unwrap()), now())
    }

    #[test]
    fn test_short_id_add_and_resolve() {
        let mut index = ShortIdIndex::new();
        assert!(index.is_empty());

        assert_eq!(index.add("INC-A".to_string()), 1);
        assert_eq!(index.add("INC-B".to_string()), 2);
        assert!(!index.is_empty());

        assert_eq!(index.resolve("@1"), Some("INC-A"));
        assert_eq!(index.resolve("2"), Some("INC-B"));
        assert_eq!(index.resolve("@99"), None);
        assert_eq!(index.resolve("INC-A"), None);
    }

    #[test]
    fn test_short_id_rebuild() {
        let mut index = ShortIdIndex::new();
        index.add("OLD-1".to_string());
        index.add("OLD-2".to_string());

        index.rebuild(vec!["NEW-1".to_string(), "NEW-2".to_string(), "NEW-3".to_string()]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.resolve("@1"), Some("NEW-1"));
        assert_eq!(index.resolve("@3"), Some("NEW-3"));
        assert_eq!(index.get_short_id("OLD-1"), None);
    }

    #[test]
    fn test_short_id_no_duplicates() {
        let mut index = ShortIdIndex::new();
        let first = index.add("INC-1".to_string());
        let second = index.add("INC-1".to_string());
        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_path_sits_beside_store() {
        let path = ShortIdIndex::path_for(Path::new("/var/ir/incidents.yaml"));
        assert_eq!(path, PathBuf::from("/var/ir/incidents.shortids.json"));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempdir().unwrap();
        let store_path = tmp.path().join("incidents.yaml");

        let mut index = ShortIdIndex::new();
        index.add("INC-1".to_string());
        index.add("INC-2".to_string());
        index.save(&store_path);

        let loaded = ShortIdIndex::load(&store_path);
        assert_eq!(loaded.resolve("@2"), Some("INC-2"));
        assert_eq!(loaded.get_short_id("INC-1"), Some(1));
    }

    #[test]
    fn test_resolve_reference_forms() {
        let a = incident_with("01J1111111111111111111111A");
        let b = incident_with("01J2222222222222222222222B");
        let incidents = vec![a.clone(), b.clone()];

        let mut index = ShortIdIndex::new();
        index.rebuild(incidents.iter().map(|i| i.id.to_string()));

        assert_eq!(resolve_reference("@2", &index, &incidents).unwrap(), b.id);
        assert_eq!(resolve_reference(&a.id.to_string(), &index, &incidents).unwrap(), a.id);
        assert_eq!(
            resolve_reference(&a.id.to_string().to_lowercase(), &index, &incidents).unwrap(),
            a.id
        );
        assert_eq!(resolve_reference("inc-01j1", &index, &incidents).unwrap(), a.id);
        assert_eq!(resolve_reference("01J2", &index, &incidents).unwrap(), b.id);
    }

    #[test]
    fn test_resolve_reference_failures() {
        let a = incident_with("01J1111111111111111111111A");
        let b = incident_with("01J2222222222222222222222B");
        let incidents = vec![a, b];
        let index = ShortIdIndex::new();

        assert!(matches!(
            resolve_reference("@7", &index, &incidents),
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(
            resolve_reference("INC-01J", &index, &incidents),
            Err(TrackerError::AmbiguousId { .. })
        ));
        assert!(matches!(
            resolve_reference("INC-7ZZZZZZZZZZZZZZZZZZZZZZZZZ", &index, &incidents),
            Err(TrackerError::NotFound(_))
        ));
    }

    #[test]
    fn test_listed_ids_resolve_when_created_in_same_millisecond() {
        let incidents: Vec<Incident> = [
            "01J0000000000000000000000A",
            "01J0000000000000000000000B",
            "01J0000000000000000000000C",
        ]
        .into_iter()
        .map(incident_with)
        .collect();
        let index = ShortIdIndex::new();

        for incident in &incidents {
            let column = format!("{:<30} ", incident.id);
            let resolved = resolve_reference(column.trim(), &index, &incidents).unwrap();
            assert_eq!(resolved, incident.id);
        }
    }
}
