//! Incident store - the single YAML file holding every incident
//!
//! A `Store` is an explicit handle on one store file. Each command builds one,
//! runs at most one load → mutate → save cycle, and drops it. Writes go to a
//! temporary file in the same directory which is then renamed over the
//! target, so a failed or interrupted save never leaves a truncated store.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::error::{Result, TrackerError};
use crate::core::identity::IncidentId;
use crate::entities::incident::{
    self, validate_and_normalize, Incident, IncidentChanges, IncidentDraft,
};
use crate::yaml::diagnostics::YamlSyntaxError;

/// Store file used when nothing else is configured
pub const DEFAULT_STORE_FILE: &str = "incidents.yaml";

/// Result of `Store::init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyInitialized,
}

/// Handle on one incident store file
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create an empty store; an existing store is left untouched
    pub fn init(&self) -> Result<InitOutcome> {
        if self.path.exists() {
            debug!(path = %self.path.display(), "store already initialized");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|e| TrackerError::persistence(parent, e))?;
        }

        self.save(&[])?;
        info!(path = %self.path.display(), "initialized incident store");
        Ok(InitOutcome::Created)
    }

    /// Read the whole collection in insertion order
    pub fn load(&self) -> Result<Vec<Incident>> {
        if !self.path.exists() {
            return Err(TrackerError::NotInitialized {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| TrackerError::corrupt(&self.path, format!("unreadable: {}", e)))?;

        let incidents = self.parse(&content)?;
        debug!(path = %self.path.display(), count = incidents.len(), "loaded incidents");
        Ok(incidents)
    }

    fn parse(&self, content: &str) -> Result<Vec<Incident>> {
        if content.trim().is_empty() {
            return Err(TrackerError::corrupt(&self.path, "file is empty"));
        }

        let incidents: Vec<Incident> = serde_yml::from_str(content).map_err(|e| {
            let filename = self.path.display().to_string();
            TrackerError::CorruptStore {
                path: self.path.clone(),
                reason: e.to_string(),
                syntax: vec![YamlSyntaxError::from_serde_error(&e, content, &filename)],
            }
        })?;

        let mut seen = HashSet::with_capacity(incidents.len());
        for incident in &incidents {
            if !seen.insert(incident.id) {
                return Err(TrackerError::corrupt(
                    &self.path,
                    format!("duplicate incident id {}", incident.id),
                ));
            }
            incident
                .check()
                .map_err(|reason| TrackerError::corrupt(&self.path, reason))?;
        }

        Ok(incidents)
    }

    /// Atomically replace the persisted collection
    pub fn save(&self, incidents: &[Incident]) -> Result<()> {
        let yaml = serde_yml::to_string(incidents).map_err(|e| {
            TrackerError::persistence(&self.path, std::io::Error::other(e.to_string()))
        })?;
        write_atomic(&self.path, yaml.as_bytes())?;
        debug!(path = %self.path.display(), count = incidents.len(), "saved incidents");
        Ok(())
    }

    /// Validate, stamp, append and persist one new incident
    pub fn create(&self, draft: &IncidentDraft) -> Result<Incident> {
        let mut created = self.create_all(std::slice::from_ref(draft))?;
        Ok(created.remove(0))
    }

    /// Validate every draft first, then append them all in one save
    pub fn create_all(&self, drafts: &[IncidentDraft]) -> Result<Vec<Incident>> {
        let validated = drafts
            .iter()
            .map(validate_and_normalize)
            .collect::<Result<Vec<_>>>()?;

        let mut incidents = self.load()?;
        let mut taken: HashSet<IncidentId> = incidents.iter().map(|i| i.id).collect();

        let mut created = Vec::with_capacity(validated.len());
        for new in validated {
            let mut id = IncidentId::new();
            while !taken.insert(id) {
                id = IncidentId::new();
            }
            created.push(new.into_incident(id, incident::now()));
        }

        incidents.extend(created.iter().cloned());
        self.save(&incidents)?;

        for incident in &created {
            info!(id = %incident.id, title = %incident.title, "created incident");
        }
        Ok(created)
    }

    /// Apply `changes` to the incident with `id` and persist the result
    pub fn find_and_update(&self, id: &IncidentId, changes: &IncidentChanges) -> Result<Incident> {
        if changes.is_empty() {
            return Err(TrackerError::NoChanges);
        }

        let mut incidents = self.load()?;
        let slot = incidents
            .iter_mut()
            .find(|i| i.id == *id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;

        let updated = changes.apply(slot)?;
        *slot = updated.clone();
        self.save(&incidents)?;

        info!(id = %updated.id, status = %updated.status, phase = %updated.phase, "updated incident");
        Ok(updated)
    }

    /// Every incident in insertion order
    pub fn all(&self) -> Result<Vec<Incident>> {
        self.load()
    }

    /// One incident by id
    pub fn get(&self, id: &IncidentId) -> Result<Incident> {
        self.load()?
            .into_iter()
            .find(|i| i.id == *id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

/// Write `data` to `path` through a temp file in the same directory
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| TrackerError::persistence(path, e))?;
    tmp.write_all(data)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| TrackerError::persistence(path, e))?;
    tmp.persist(path)
        .map_err(|e| TrackerError::persistence(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::incident::{Phase, Severity, Status};
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, Store) {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path().join(DEFAULT_STORE_FILE));
        store.init().unwrap();
        (tmp, store)
    }

    fn draft(title: &str) -> IncidentDraft {
        IncidentDraft::new(title)
            .with_category("malware")
            .with_severity("high")
            .with_owner("IR team")
    }

    #[test]
    fn test_load_without_init_fails() {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path().join("missing.yaml"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, TrackerError::NotInitialized { .. }));
    }

    #[test]
    fn test_init_creates_empty_store_and_nested_dirs() {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path().join("deep/nested/incidents.yaml"));
        assert_eq!(store.init().unwrap(), InitOutcome::Created);
        assert!(store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_init_twice_keeps_records() {
        let (_tmp, store) = setup();
        store.create(&draft("Ransomware on file server")).unwrap();
        assert_eq!(store.init().unwrap(), InitOutcome::AlreadyInitialized);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_save_load_round_trip_preserves_order() {
        let (_tmp, store) = setup();
        for title in ["first", "second", "third"] {
            store.create(&draft(title)).unwrap();
        }
        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();
        let reloaded = store.load().unwrap();

        assert_eq!(loaded, reloaded);
        let titles: Vec<&str> = reloaded.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let (_tmp, store) = setup();
        let ids: HashSet<IncidentId> = (0..25)
            .map(|n| store.create(&draft(&format!("incident {n}"))).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn test_create_sets_defaults_and_timestamps() {
        let (_tmp, store) = setup();
        let incident = store.create(&IncidentDraft::new("Odd login")).unwrap();
        assert_eq!(incident.status, Status::Open);
        assert_eq!(incident.phase, Phase::Detect);
        assert_eq!(incident.severity, Severity::Medium);
        assert_eq!(incident.created_at, incident.updated_at);
    }

    #[test]
    fn test_create_rejects_invalid_without_touching_file() {
        let (_tmp, store) = setup();
        store.create(&draft("existing")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store
            .create(&IncidentDraft::new("bad").with_phase("triage"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidField { name: "phase", .. }));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_create_all_is_all_or_nothing() {
        let (_tmp, store) = setup();
        let drafts = vec![draft("good"), IncidentDraft::new("")];
        assert!(store.create_all(&drafts).is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_update_isolation() {
        let (_tmp, store) = setup();
        let a = store.create(&draft("a")).unwrap();
        let b = store.create(&draft("b")).unwrap();
        let c = store.create(&draft("c")).unwrap();

        let changes = IncidentChanges::default().with_status(Status::Contained);
        let updated = store.find_and_update(&b.id, &changes).unwrap();

        let all = store.load().unwrap();
        assert_eq!(all[0], a);
        assert_eq!(all[2], c);
        assert_eq!(all[1], updated);

        let mut expected = b.clone();
        expected.status = Status::Contained;
        expected.updated_at = updated.updated_at;
        assert_eq!(updated, expected);
        assert!(updated.updated_at > b.updated_at);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (_tmp, store) = setup();
        store.create(&draft("a")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store
            .find_and_update(
                &IncidentId::new(),
                &IncidentChanges::default().with_status(Status::Closed),
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_update_without_changes_is_rejected() {
        let (_tmp, store) = setup();
        let a = store.create(&draft("a")).unwrap();
        let err = store
            .find_and_update(&a.id, &IncidentChanges::default())
            .unwrap_err();
        assert!(matches!(err, TrackerError::NoChanges));
    }

    #[test]
    fn test_get_by_id() {
        let (_tmp, store) = setup();
        let a = store.create(&draft("a")).unwrap();
        assert_eq!(store.get(&a.id).unwrap(), a);
        assert!(matches!(
            store.get(&IncidentId::new()),
            Err(TrackerError::NotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_yaml_is_reported() {
        let (_tmp, store) = setup();
        fs::write(store.path(), "- id: [broken\n").unwrap();
        let err = store.load().unwrap_err();
        match err {
            TrackerError::CorruptStore { syntax, .. } => assert_eq!(syntax.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_status_on_disk_is_corrupt() {
        let (_tmp, store) = setup();
        store.create(&draft("a")).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        fs::write(store.path(), content.replace("status: open", "status: pending")).unwrap();
        assert!(matches!(
            store.load(),
            Err(TrackerError::CorruptStore { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let (_tmp, store) = setup();
        let a = store.create(&draft("a")).unwrap();
        fs::write(store.path(), serde_yml::to_string(&vec![a.clone(), a]).unwrap()).unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_file_is_corrupt_not_reinitialized() {
        let (_tmp, store) = setup();
        fs::write(store.path(), "").unwrap();
        assert!(matches!(
            store.load(),
            Err(TrackerError::CorruptStore { .. })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (tmp, store) = setup();
        store.create(&draft("a")).unwrap();
        store.create(&draft("b")).unwrap();
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_into_missing_dir_fails_cleanly() {
        let tmp = tempdir().unwrap();
        let store = Store::new(tmp.path().join("nope/incidents.yaml"));
        let err = store.save(&[]).unwrap_err();
        assert!(matches!(err, TrackerError::PersistenceFailure { .. }));
    }
}
