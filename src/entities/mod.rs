//! Entity type definitions
//!
//! irt tracks a single entity type, the [`Incident`], together with the
//! vocabularies its enumerated fields draw from.

pub mod incident;

pub use incident::{
    Category, Incident, IncidentChanges, IncidentDraft, NotesChange, Phase, RawChanges, Severity,
    Status, Tag,
};
