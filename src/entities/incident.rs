//! Incident entity - one tracked security event and its vocabularies
//!
//! Severity, phase and status are closed sets. Category is a known set with a
//! free-text fallback. All tags accept loose operator spelling (case, `-` vs
//! `_`, a few synonyms) and always store and render in canonical form.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TrackerError};
use crate::core::identity::IncidentId;

/// Lowercase, trim, and fold `-` and spaces into `_`
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// A closed tag vocabulary
pub trait Tag: Sized + Copy + 'static {
    /// Field name used in error messages
    const FIELD: &'static str;

    /// Every member, in declaration order
    const ALL: &'static [Self];

    /// Canonical spelling
    fn as_str(&self) -> &'static str;

    /// Look up an already-normalized tag, including synonyms
    fn from_normalized(tag: &str) -> Option<Self>;

    /// Comma-separated list of canonical values
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse operator input for a record field
    fn parse_field(raw: &str) -> Result<Self> {
        Self::from_normalized(&normalize_tag(raw)).ok_or_else(|| TrackerError::InvalidField {
            name: Self::FIELD,
            value: raw.to_string(),
            expected: format!("one of: {}", Self::expected()),
        })
    }

    /// Parse operator input for a list/export/stats filter
    fn parse_filter(raw: &str) -> Result<Self> {
        Self::from_normalized(&normalize_tag(raw)).ok_or_else(|| TrackerError::InvalidFilter {
            name: Self::FIELD,
            value: raw.to_string(),
            expected: format!("one of: {}", Self::expected()),
        })
    }
}

/// Severity, ordered by rank (low < medium < high < critical)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric rank, 1 (low) to 4 (critical)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }
}

impl Tag for Severity {
    const FIELD: &'static str = "severity";
    const ALL: &'static [Self] = &[
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    fn from_normalized(tag: &str) -> Option<Self> {
        match tag {
            "low" => Some(Severity::Low),
            "medium" | "med" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" | "crit" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// NIST SP 800-61 lifecycle phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preparation,
    #[default]
    Detect,
    /// Containment; operators often call this "respond"
    Contain,
    Eradicate,
    Recover,
    LessonsLearned,
}

impl Tag for Phase {
    const FIELD: &'static str = "phase";
    const ALL: &'static [Self] = &[
        Phase::Preparation,
        Phase::Detect,
        Phase::Contain,
        Phase::Eradicate,
        Phase::Recover,
        Phase::LessonsLearned,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Phase::Preparation => "preparation",
            Phase::Detect => "detect",
            Phase::Contain => "contain",
            Phase::Eradicate => "eradicate",
            Phase::Recover => "recover",
            Phase::LessonsLearned => "lessons_learned",
        }
    }

    fn from_normalized(tag: &str) -> Option<Self> {
        match tag {
            "preparation" | "prepare" | "protect" => Some(Phase::Preparation),
            "detect" | "detection" | "analysis" | "identify" | "detect_and_analyze" => {
                Some(Phase::Detect)
            }
            "contain" | "containment" | "respond" | "response" => Some(Phase::Contain),
            "eradicate" | "eradication" => Some(Phase::Eradicate),
            "recover" | "recovery" => Some(Phase::Recover),
            "lessons_learned" | "lessons" | "post_incident" => Some(Phase::LessonsLearned),
            _ => None,
        }
    }
}

/// Operational disposition of the remediation work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Contained,
    Resolved,
    Closed,
}

impl Status {
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Closed)
    }
}

impl Tag for Status {
    const FIELD: &'static str = "status";
    const ALL: &'static [Self] = &[
        Status::Open,
        Status::InProgress,
        Status::Contained,
        Status::Resolved,
        Status::Closed,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Contained => "contained",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    fn from_normalized(tag: &str) -> Option<Self> {
        match tag {
            "open" => Some(Status::Open),
            "in_progress" | "inprogress" | "active" => Some(Status::InProgress),
            "contained" => Some(Status::Contained),
            "resolved" | "eradicated" | "recovered" => Some(Status::Resolved),
            "closed" => Some(Status::Closed),
            _ => None,
        }
    }
}

macro_rules! tag_display_from_str {
    ($($ty:ty),*) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::from_normalized(&normalize_tag(s)).ok_or_else(|| {
                    format!("Unknown {}: {}. Use one of: {}", Self::FIELD, s, Self::expected())
                })
            }
        }
    )*};
}

tag_display_from_str!(Severity, Phase, Status);

/// Incident category: a known tag or a free-text one
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Phishing,
    Malware,
    UnauthorizedAccess,
    DataLeak,
    DenialOfService,
    #[default]
    Other,
    /// Anything else, stored normalized
    Custom(String),
}

impl Category {
    /// The built-in categories
    pub const KNOWN: &'static [Category] = &[
        Category::Phishing,
        Category::Malware,
        Category::UnauthorizedAccess,
        Category::DataLeak,
        Category::DenialOfService,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Phishing => "phishing",
            Category::Malware => "malware",
            Category::UnauthorizedAccess => "unauthorized_access",
            Category::DataLeak => "data_leak",
            Category::DenialOfService => "denial_of_service",
            Category::Other => "other",
            Category::Custom(tag) => tag,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }

    /// Normalize operator input; only an empty tag is rejected
    pub fn parse(raw: &str) -> Option<Self> {
        let tag = normalize_tag(raw);
        let category = match tag.as_str() {
            "" => return None,
            "phishing" => Category::Phishing,
            "malware" => Category::Malware,
            "unauthorized_access" | "unauthorized" | "access" => Category::UnauthorizedAccess,
            "data_leak" | "data_loss" | "leak" => Category::DataLeak,
            "denial_of_service" | "dos" | "ddos" => Category::DenialOfService,
            "other" => Category::Other,
            _ => Category::Custom(tag),
        };
        Some(category)
    }

    fn expected() -> String {
        let known: Vec<&str> = Self::KNOWN.iter().map(|c| c.as_str()).collect();
        format!("a non-empty tag such as {}", known.join(", "))
    }

    pub(crate) fn parse_field(raw: &str) -> Result<Self> {
        Self::parse(raw).ok_or_else(|| TrackerError::InvalidField {
            name: "category",
            value: raw.to_string(),
            expected: Self::expected(),
        })
    }

    pub(crate) fn parse_filter(raw: &str) -> Result<Self> {
        Self::parse(raw).ok_or_else(|| TrackerError::InvalidFilter {
            name: "category",
            value: raw.to_string(),
            expected: Self::expected(),
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| "Category must not be empty".to_string())
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// Current time at the precision incidents are stored with (microseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A timestamp strictly later than `previous`
pub fn later_than(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// A tracked incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique identifier, never reused
    pub id: IncidentId,

    pub title: String,

    pub category: Category,

    pub severity: Severity,

    pub phase: Phase,

    pub status: Status,

    /// Person or team handling it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Refresh `updated_at`, keeping it strictly increasing
    pub fn touch(&mut self) {
        self.updated_at = later_than(self.updated_at);
    }

    /// Record-level invariants that deserialization alone cannot enforce
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(format!("incident {} has an empty title", self.id));
        }
        if self.created_at > self.updated_at {
            return Err(format!(
                "incident {} was updated ({}) before it was created ({})",
                self.id, self.updated_at, self.created_at
            ));
        }
        Ok(())
    }
}

/// Raw operator input for a new incident
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentDraft {
    pub title: String,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub phase: Option<String>,
    pub owner: Option<String>,
    pub notes: Option<String>,
}

impl IncidentDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A validated draft, waiting for an id and timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub title: String,
    pub category: Category,
    pub severity: Severity,
    pub phase: Phase,
    pub owner: Option<String>,
    pub notes: Option<String>,
}

impl NewIncident {
    /// Stamp the record; new incidents always start `open`
    pub fn into_incident(self, id: IncidentId, created_at: DateTime<Utc>) -> Incident {
        Incident {
            id,
            title: self.title,
            category: self.category,
            severity: self.severity,
            phase: self.phase,
            status: Status::Open,
            owner: self.owner,
            notes: self.notes,
            created_at,
            updated_at: created_at,
        }
    }
}

fn parse_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TrackerError::InvalidField {
            name: "title",
            value: raw.to_string(),
            expected: "a non-empty title".to_string(),
        });
    }
    Ok(title.to_string())
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate a draft and fill creation defaults
pub fn validate_and_normalize(draft: &IncidentDraft) -> Result<NewIncident> {
    let title = parse_title(&draft.title)?;
    let category = match draft.category.as_deref() {
        Some(raw) => Category::parse_field(raw)?,
        None => Category::default(),
    };
    let severity = match draft.severity.as_deref() {
        Some(raw) => Severity::parse_field(raw)?,
        None => Severity::default(),
    };
    let phase = match draft.phase.as_deref() {
        Some(raw) => Phase::parse_field(raw)?,
        None => Phase::default(),
    };

    Ok(NewIncident {
        title,
        category,
        severity,
        phase,
        owner: non_blank(draft.owner.as_deref()),
        notes: non_blank(draft.notes.as_deref()),
    })
}

/// How an update treats the notes field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesChange {
    /// Add a new line after any existing notes
    Append(String),
    /// Overwrite; an empty string clears the notes
    Replace(String),
}

/// Raw operator input for an update; `None` means "not supplied"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub phase: Option<String>,
    pub status: Option<String>,
    pub owner: Option<String>,
    pub append_notes: Option<String>,
    pub replace_notes: Option<String>,
}

/// A validated partial update. Fields left `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentChanges {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub severity: Option<Severity>,
    pub phase: Option<Phase>,
    pub status: Option<Status>,
    /// `Some("")` clears the owner
    pub owner: Option<String>,
    pub notes: Option<NotesChange>,
}

impl IncidentChanges {
    /// Validate every supplied field; nothing is defaulted
    pub fn parse(raw: &RawChanges) -> Result<Self> {
        let notes = match (&raw.append_notes, &raw.replace_notes) {
            (Some(_), Some(_)) => {
                return Err(TrackerError::InvalidField {
                    name: "notes",
                    value: "--notes with --replace-notes".to_string(),
                    expected: "either an append or a replacement, not both".to_string(),
                })
            }
            (Some(text), None) => Some(NotesChange::Append(text.clone())),
            (None, Some(text)) => Some(NotesChange::Replace(text.clone())),
            (None, None) => None,
        };

        Ok(Self {
            title: raw.title.as_deref().map(parse_title).transpose()?,
            category: raw.category.as_deref().map(Category::parse_field).transpose()?,
            severity: raw.severity.as_deref().map(Severity::parse_field).transpose()?,
            phase: raw.phase.as_deref().map(Phase::parse_field).transpose()?,
            status: raw.status.as_deref().map(Status::parse_field).transpose()?,
            owner: raw.owner.as_ref().map(|o| o.trim().to_string()),
            notes,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_notes(mut self, notes: NotesChange) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Apply to a copy of `incident`, refresh `updated_at`, and re-check it
    pub fn apply(&self, incident: &Incident) -> Result<Incident> {
        let mut updated = incident.clone();

        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if let Some(category) = &self.category {
            updated.category = category.clone();
        }
        if let Some(severity) = self.severity {
            updated.severity = severity;
        }
        if let Some(phase) = self.phase {
            updated.phase = phase;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(owner) = &self.owner {
            updated.owner = non_blank(Some(owner));
        }
        match &self.notes {
            Some(NotesChange::Append(text)) => {
                updated.notes = match (updated.notes.take(), non_blank(Some(text))) {
                    (Some(existing), Some(addition)) => Some(format!("{}\n{}", existing, addition)),
                    (existing, addition) => addition.or(existing),
                };
            }
            Some(NotesChange::Replace(text)) => updated.notes = non_blank(Some(text)),
            None => {}
        }

        updated.touch();
        updated.check().map_err(|reason| TrackerError::InvalidField {
            name: "incident",
            value: updated.id.to_string(),
            expected: reason,
        })?;
        Ok(updated)
    }
}
