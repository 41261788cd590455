//! Mentor resolution for program applications.
//!
//! Every successful application must carry a concrete, accountable mentor.
//! Programs frequently arrive without one: the instructor field may be empty,
//! a free-text name, or the "TBD" sentinel. Resolution is deterministic and
//! prefers explicit assignment over inference over arbitrary fallback.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{InstructorRef, Program};
use crate::directory::IdentityDirectory;
use crate::mentorship::domain::UserId;
use crate::storage::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no mentor-role user is available for assignment")]
    NoMentorAvailable,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Resolves the mentor who should own an application to a program.
pub struct MentorResolver<D> {
    directory: Arc<D>,
}

impl<D: IdentityDirectory> MentorResolver<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Resolve the accountable mentor for `program`.
    ///
    /// Order, each step tried only when the previous yields nothing:
    /// 1. the program's explicit `assigned_mentor`, if it names a mentor;
    /// 2. an instructor field holding a user id, if it names a mentor;
    /// 3. a free-text instructor name, matched case-insensitively as a
    ///    substring of mentor full names, first match in directory order;
    /// 4. the first mentor in directory (creation) order;
    /// 5. `NoMentorAvailable` when the directory has no mentors at all.
    pub fn resolve(&self, program: &Program) -> Result<UserId, ResolveError> {
        if let Some(candidate) = &program.assigned_mentor {
            if let Some(mentor) = self.mentor_by_id(candidate)? {
                debug!(program = %program.id, mentor = %mentor, "resolved via explicit assignment");
                return Ok(mentor);
            }
        }

        match &program.instructor {
            InstructorRef::Id(candidate) => {
                if let Some(mentor) = self.mentor_by_id(candidate)? {
                    debug!(program = %program.id, mentor = %mentor, "resolved via instructor id");
                    return Ok(mentor);
                }
            }
            InstructorRef::Name(name) => {
                let needle = name.to_lowercase();
                if let Some(mentor) = self
                    .directory
                    .mentors()?
                    .into_iter()
                    .find(|mentor| mentor.full_name.to_lowercase().contains(&needle))
                {
                    debug!(program = %program.id, mentor = %mentor.id, "resolved via instructor name match");
                    return Ok(mentor.id);
                }
            }
            InstructorRef::Unassigned => {}
        }

        match self.directory.mentors()?.into_iter().next() {
            Some(mentor) => {
                debug!(program = %program.id, mentor = %mentor.id, "resolved via default assignment");
                Ok(mentor.id)
            }
            None => Err(ResolveError::NoMentorAvailable),
        }
    }

    /// A candidate id only resolves when the directory knows it as a
    /// mentor-role user; anything else falls through to the next step.
    fn mentor_by_id(&self, candidate: &UserId) -> Result<Option<UserId>, ResolveError> {
        Ok(self
            .directory
            .find_user(candidate)?
            .filter(|user| user.is_mentor())
            .map(|user| user.id))
    }
}
