//! Enrollment persistence contract and its in-memory implementation.
//!
//! The store owns every student profile and is the only place enrollment
//! invariants meet persistence: duplicate checks and status rules are
//! re-verified inside the per-profile write so concurrent requests for the
//! same student serialize instead of racing. The core performs no retries;
//! transport failures surface as [`StorageError`] for the caller to judge.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::mentorship::domain::{
    Enrollment, EnrollmentError, EnrollmentId, EnrollmentStatus, Feedback, ProgramId, ResumeRef,
    ReviewSelector, StudentProfile, UserId,
};
use crate::storage::StorageError;

/// Inputs for a new enrollment; the store issues the id and timestamps.
#[derive(Debug, Clone)]
pub struct EnrollmentDraft {
    pub target_mentor: UserId,
    pub target_program: Option<ProgramId>,
    pub notes: String,
    pub skills: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an application for this mentor and program already exists")]
    DuplicateApplication,
    #[error("student profile not found")]
    ProfileNotFound,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Storage contract for student profiles and their enrollments.
///
/// Implementations must make each mutating call transactional per profile:
/// the invariant it protects is checked and the write applied under the same
/// critical section.
pub trait EnrollmentStore: Send + Sync {
    /// Idempotent: returns the existing profile or creates an empty one.
    fn get_or_create_profile(&self, student: &UserId) -> Result<StudentProfile, StoreError>;

    fn find_profile(&self, student: &UserId) -> Result<Option<StudentProfile>, StoreError>;

    /// Append a pending enrollment, rejecting duplicates of the
    /// (mentor, program) key. Creates the profile when absent.
    fn append_enrollment(
        &self,
        student: &UserId,
        draft: EnrollmentDraft,
    ) -> Result<Enrollment, StoreError>;

    /// Idempotent set-insert of a career interest. Creates the profile when
    /// absent.
    fn add_career_interest(&self, student: &UserId, program: &ProgramId)
        -> Result<(), StoreError>;

    /// Replace the profile's resume reference; a single current resume is
    /// kept, not a history. Creates the profile when absent.
    fn attach_resume(
        &self,
        student: &UserId,
        url: String,
        filename: String,
    ) -> Result<ResumeRef, StoreError>;

    /// Transition an enrollment addressed by id, enforcing the legal edges
    /// (pending -> approved/rejected, approved -> completed).
    fn transition(
        &self,
        student: &UserId,
        enrollment: &EnrollmentId,
        next: EnrollmentStatus,
        notes: Option<String>,
    ) -> Result<Enrollment, StoreError>;

    /// Transition the first enrollment, in insertion order, within the
    /// mentor's scope matching `selector` and currently in the status the
    /// transition starts from. `EnrollmentNotFound` when nothing matches.
    fn transition_first_match(
        &self,
        student: &UserId,
        mentor: &UserId,
        selector: &ReviewSelector,
        next: EnrollmentStatus,
        notes: Option<String>,
    ) -> Result<Enrollment, StoreError>;

    /// Attach feedback to a completed enrollment in the student's profile.
    fn attach_feedback(
        &self,
        student: &UserId,
        enrollment: &EnrollmentId,
        rating: u8,
        comment: String,
    ) -> Result<Feedback, StoreError>;

    /// All enrollments across profiles targeting `mentor`, optionally
    /// filtered by program, paired with the owning student id. Ordered by
    /// student id, then application order.
    fn enrollments_for_mentor(
        &self,
        mentor: &UserId,
        program: Option<&ProgramId>,
    ) -> Result<Vec<(UserId, Enrollment)>, StoreError>;
}

/// Mutex-guarded map of student profiles. One lock covers the whole map,
/// which trivially satisfies per-profile write transactionality; a sharded
/// layout could narrow the section without changing the contract.
#[derive(Debug, Default)]
pub struct InMemoryEnrollmentStore {
    profiles: Mutex<BTreeMap<UserId, StudentProfile>>,
    sequence: AtomicU64,
}

impl InMemoryEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_enrollment_id(&self) -> EnrollmentId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        EnrollmentId(format!("enr-{id:06}"))
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<UserId, StudentProfile>>, StoreError> {
        self.profiles
            .lock()
            .map_err(|_| StoreError::Storage(StorageError::new("profile store mutex poisoned")))
    }
}

impl EnrollmentStore for InMemoryEnrollmentStore {
    fn get_or_create_profile(&self, student: &UserId) -> Result<StudentProfile, StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles
            .entry(student.clone())
            .or_insert_with(|| StudentProfile::new(student.clone()));
        Ok(profile.clone())
    }

    fn find_profile(&self, student: &UserId) -> Result<Option<StudentProfile>, StoreError> {
        let profiles = self.lock()?;
        Ok(profiles.get(student).cloned())
    }

    fn append_enrollment(
        &self,
        student: &UserId,
        draft: EnrollmentDraft,
    ) -> Result<Enrollment, StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles
            .entry(student.clone())
            .or_insert_with(|| StudentProfile::new(student.clone()));

        // The uniqueness check runs under the same lock as the append, so two
        // concurrent applies for one student cannot both pass it.
        if profile.has_application(&draft.target_mentor, draft.target_program.as_ref()) {
            return Err(StoreError::DuplicateApplication);
        }

        let enrollment = Enrollment::new(
            self.next_enrollment_id(),
            draft.target_mentor,
            draft.target_program,
            draft.notes,
            draft.skills,
            Utc::now(),
        );
        profile.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    fn add_career_interest(
        &self,
        student: &UserId,
        program: &ProgramId,
    ) -> Result<(), StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles
            .entry(student.clone())
            .or_insert_with(|| StudentProfile::new(student.clone()));
        profile.add_career_interest(program.clone());
        Ok(())
    }

    fn attach_resume(
        &self,
        student: &UserId,
        url: String,
        filename: String,
    ) -> Result<ResumeRef, StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles
            .entry(student.clone())
            .or_insert_with(|| StudentProfile::new(student.clone()));
        let resume = ResumeRef {
            url,
            filename,
            uploaded_at: Utc::now(),
        };
        profile.resume = Some(resume.clone());
        Ok(resume)
    }

    fn transition(
        &self,
        student: &UserId,
        enrollment: &EnrollmentId,
        next: EnrollmentStatus,
        notes: Option<String>,
    ) -> Result<Enrollment, StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles.get_mut(student).ok_or(StoreError::ProfileNotFound)?;
        let record = profile
            .enrollment_mut(enrollment)
            .ok_or(StoreError::EnrollmentNotFound)?;
        record.transition(next, notes, Utc::now())?;
        Ok(record.clone())
    }

    fn transition_first_match(
        &self,
        student: &UserId,
        mentor: &UserId,
        selector: &ReviewSelector,
        next: EnrollmentStatus,
        notes: Option<String>,
    ) -> Result<Enrollment, StoreError> {
        let Some(source) = next.required_source() else {
            return Err(StoreError::EnrollmentNotFound);
        };

        let mut profiles = self.lock()?;
        let profile = profiles.get_mut(student).ok_or(StoreError::ProfileNotFound)?;
        let record = profile
            .first_match_mut(mentor, selector, source)
            .ok_or(StoreError::EnrollmentNotFound)?;
        record.transition(next, notes, Utc::now())?;
        Ok(record.clone())
    }

    fn attach_feedback(
        &self,
        student: &UserId,
        enrollment: &EnrollmentId,
        rating: u8,
        comment: String,
    ) -> Result<Feedback, StoreError> {
        let mut profiles = self.lock()?;
        let profile = profiles.get_mut(student).ok_or(StoreError::ProfileNotFound)?;
        let record = profile
            .enrollment_mut(enrollment)
            .ok_or(StoreError::EnrollmentNotFound)?;
        let feedback = record.attach_feedback(rating, comment, Utc::now())?;
        Ok(feedback)
    }

    fn enrollments_for_mentor(
        &self,
        mentor: &UserId,
        program: Option<&ProgramId>,
    ) -> Result<Vec<(UserId, Enrollment)>, StoreError> {
        let profiles = self.lock()?;
        let mut rows = Vec::new();
        for (student, profile) in profiles.iter() {
            for enrollment in &profile.enrollments {
                if &enrollment.target_mentor != mentor {
                    continue;
                }
                if let Some(program) = program {
                    if enrollment.target_program.as_ref() != Some(program) {
                        continue;
                    }
                }
                rows.push((student.clone(), enrollment.clone()));
            }
        }
        Ok(rows)
    }
}
