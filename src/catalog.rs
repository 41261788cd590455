//! Program Catalog: read-only lookups of career-program records.
//!
//! Program content editing is out of scope; the core reads a program to
//! route an application and to render lightweight summaries. The source
//! system stored the instructor as free text defaulting to the sentinel
//! "TBD"; that ambiguity is classified once at this boundary into
//! [`InstructorRef`] so nothing downstream probes strings.

use serde::{Deserialize, Serialize};

use crate::mentorship::domain::{ProgramId, UserId};
use crate::storage::StorageError;

/// Nominal instructor reference carried by a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructorRef {
    /// Absent, blank, or the "TBD" sentinel.
    Unassigned,
    /// A well-formed user id (not yet checked against the directory).
    Id(UserId),
    /// Free text, typically a person's name.
    Name(String),
}

impl InstructorRef {
    /// Classify a raw instructor field. "TBD" is matched case-insensitively
    /// and surrounding whitespace is ignored.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("tbd") {
            return Self::Unassigned;
        }
        match UserId::parse(trimmed) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(trimmed.to_string()),
        }
    }
}

/// Career-program definition, read-only from the core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub title: String,
    pub category: String,
    pub level: String,
    pub description: String,
    /// Explicit mentor assignment, takes precedence over `instructor`.
    pub assigned_mentor: Option<UserId>,
    pub instructor: InstructorRef,
}

impl Program {
    pub fn summary(&self) -> ProgramSummary {
        ProgramSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            level: self.level.clone(),
        }
    }
}

/// Lightweight projection for joined listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: ProgramId,
    pub title: String,
    pub category: String,
    pub level: String,
}

/// Read-only catalog lookups consumed by the enrollment core.
pub trait ProgramCatalog: Send + Sync {
    fn find_program(&self, id: &ProgramId) -> Result<Option<Program>, StorageError>;
}

/// Catalog backed by an in-memory program list.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    programs: Vec<Program>,
}

impl InMemoryCatalog {
    pub fn from_programs(programs: Vec<Program>) -> Self {
        Self { programs }
    }
}

impl ProgramCatalog for InMemoryCatalog {
    fn find_program(&self, id: &ProgramId) -> Result<Option<Program>, StorageError> {
        Ok(self.programs.iter().find(|program| &program.id == id).cloned())
    }
}
