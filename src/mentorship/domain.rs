//! Domain model for the enrollment lifecycle.
//!
//! Everything here is pure: rules take the current time as an argument and
//! mutate in place, while the store decides when a mutation is allowed to
//! reach persistence. Identifier well-formedness follows the source system's
//! object-id format (24 hex characters).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const OBJECT_ID_LEN: usize = 24;

fn is_well_formed(raw: &str) -> bool {
    raw.len() == OBJECT_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Raised when an inbound identifier is not a 24 character hex object id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed identifier '{0}': expected a 24 character hex object id")]
pub struct MalformedId(pub String);

/// Identifier of a user record owned by the Identity Directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, MalformedId> {
        if is_well_formed(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(MalformedId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a career program owned by the Program Catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramId(String);

impl ProgramId {
    pub fn parse(raw: &str) -> Result<Self, MalformedId> {
        if is_well_formed(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(MalformedId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-issued enrollment identifier, stable for the enrollment's lifetime
/// and never reassigned across student profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application status; see [`Enrollment::transition`] for the legal edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl EnrollmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Approved => "approved",
            EnrollmentStatus::Rejected => "rejected",
            EnrollmentStatus::Completed => "completed",
        }
    }

    /// Status an enrollment must currently hold for a legal transition into
    /// `self`. `None` means nothing transitions into this status.
    pub const fn required_source(self) -> Option<EnrollmentStatus> {
        match self {
            EnrollmentStatus::Approved | EnrollmentStatus::Rejected => {
                Some(EnrollmentStatus::Pending)
            }
            EnrollmentStatus::Completed => Some(EnrollmentStatus::Approved),
            EnrollmentStatus::Pending => None,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule violations raised by enrollment mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentError {
    #[error("illegal status transition {from} -> {to}")]
    InvalidTransition {
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    },
    #[error("feedback requires a completed enrollment (status is {status})")]
    NotCompleted { status: EnrollmentStatus },
    #[error("rating {0} is outside the accepted range 1..=5")]
    InvalidRating(u8),
}

/// Student feedback attached after completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: u8,
    pub comment: String,
    pub submitted_date: DateTime<Utc>,
}

/// Opaque reference to an externally stored resume file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRef {
    pub url: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// One student application targeting a mentor and optionally a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    /// Always a concrete mentor-role user; resolution happens before the
    /// enrollment is created, never inside it.
    pub target_mentor: UserId,
    pub target_program: Option<ProgramId>,
    pub status: EnrollmentStatus,
    pub applied_date: DateTime<Utc>,
    pub approved_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub skills: String,
    pub feedback: Option<Feedback>,
}

impl Enrollment {
    pub fn new(
        id: EnrollmentId,
        target_mentor: UserId,
        target_program: Option<ProgramId>,
        notes: String,
        skills: String,
        applied_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            target_mentor,
            target_program,
            status: EnrollmentStatus::Pending,
            applied_date,
            approved_date: None,
            notes,
            skills,
            feedback: None,
        }
    }

    /// Duplicate-application key: same mentor and the same program value,
    /// where "no program" only collides with "no program".
    pub fn same_target(&self, mentor: &UserId, program: Option<&ProgramId>) -> bool {
        &self.target_mentor == mentor && self.target_program.as_ref() == program
    }

    /// Apply a status change. Legal edges are pending -> approved,
    /// pending -> rejected, and approved -> completed; anything else fails.
    /// Reviewer notes overwrite prior notes only when non-empty.
    pub fn transition(
        &mut self,
        next: EnrollmentStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), EnrollmentError> {
        let legal = matches!(
            (self.status, next),
            (EnrollmentStatus::Pending, EnrollmentStatus::Approved)
                | (EnrollmentStatus::Pending, EnrollmentStatus::Rejected)
                | (EnrollmentStatus::Approved, EnrollmentStatus::Completed)
        );
        if !legal {
            return Err(EnrollmentError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        if next == EnrollmentStatus::Approved {
            self.approved_date = Some(now);
        }
        if let Some(notes) = notes {
            if !notes.trim().is_empty() {
                self.notes = notes;
            }
        }
        Ok(())
    }

    /// Attach feedback. The rating bound is checked before the completion
    /// guard so an out-of-range rating never reaches a status comparison,
    /// and neither check mutates the record.
    pub fn attach_feedback(
        &mut self,
        rating: u8,
        comment: String,
        now: DateTime<Utc>,
    ) -> Result<Feedback, EnrollmentError> {
        if !(1..=5).contains(&rating) {
            return Err(EnrollmentError::InvalidRating(rating));
        }
        if self.status != EnrollmentStatus::Completed {
            return Err(EnrollmentError::NotCompleted {
                status: self.status,
            });
        }

        let feedback = Feedback {
            rating,
            comment,
            submitted_date: now,
        };
        self.feedback = Some(feedback.clone());
        Ok(feedback)
    }
}

/// Addresses an enrollment within a mentor's scope during review: either by
/// its id or by the program it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewSelector {
    Enrollment(EnrollmentId),
    Program(ProgramId),
}

impl ReviewSelector {
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        match self {
            ReviewSelector::Enrollment(id) => &enrollment.id == id,
            ReviewSelector::Program(program) => {
                enrollment.target_program.as_ref() == Some(program)
            }
        }
    }
}

/// Per-student aggregate owning enrollments and career interests. Created
/// lazily on first interaction and never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: UserId,
    /// Unique program ids the student has shown interest in. Insertion order
    /// is retained for stable output but carries no meaning.
    pub career_interests: Vec<ProgramId>,
    /// Insertion order is application order; scans below rely on it.
    pub enrollments: Vec<Enrollment>,
    pub resume: Option<ResumeRef>,
}

impl StudentProfile {
    pub fn new(student_id: UserId) -> Self {
        Self {
            student_id,
            career_interests: Vec::new(),
            enrollments: Vec::new(),
            resume: None,
        }
    }

    /// Linear scan for a duplicate application. The scan order (insertion
    /// order, first match wins) is a behavioral contract: if legacy data ever
    /// violates uniqueness, the earliest enrollment is the canonical one.
    pub fn has_application(&self, mentor: &UserId, program: Option<&ProgramId>) -> bool {
        self.enrollments
            .iter()
            .any(|enrollment| enrollment.same_target(mentor, program))
    }

    /// Idempotent set-insert; returns whether the interest was new.
    pub fn add_career_interest(&mut self, program: ProgramId) -> bool {
        if self.career_interests.contains(&program) {
            return false;
        }
        self.career_interests.push(program);
        true
    }

    pub fn enrollment_mut(&mut self, id: &EnrollmentId) -> Option<&mut Enrollment> {
        self.enrollments.iter_mut().find(|enrollment| &enrollment.id == id)
    }

    /// First enrollment, in insertion order, within the mentor's scope that
    /// matches the selector and currently holds `status`.
    pub fn first_match_mut(
        &mut self,
        mentor: &UserId,
        selector: &ReviewSelector,
        status: EnrollmentStatus,
    ) -> Option<&mut Enrollment> {
        self.enrollments.iter_mut().find(|enrollment| {
            &enrollment.target_mentor == mentor
                && enrollment.status == status
                && selector.matches(enrollment)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid")
    }

    fn mentor() -> UserId {
        UserId::parse("aaaaaaaaaaaaaaaaaaaaaaa1").expect("well-formed")
    }

    fn program() -> ProgramId {
        ProgramId::parse("bbbbbbbbbbbbbbbbbbbbbbb1").expect("well-formed")
    }

    fn enrollment(id: &str, program: Option<ProgramId>) -> Enrollment {
        Enrollment::new(
            EnrollmentId(id.to_string()),
            mentor(),
            program,
            "motivation".to_string(),
            "rust".to_string(),
            now(),
        )
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("short").is_err());
        assert!(UserId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(UserId::parse("aaaaaaaaaaaaaaaaaaaaaaa1").is_ok());
    }

    #[test]
    fn parse_normalizes_hex_case() {
        let id = UserId::parse("AAAAAAAAAAAAAAAAAAAAAAA1").expect("valid hex");
        assert_eq!(id.as_str(), "aaaaaaaaaaaaaaaaaaaaaaa1");
    }

    #[test]
    fn approval_sets_approved_date() {
        let mut e = enrollment("enr-1", None);
        e.transition(EnrollmentStatus::Approved, None, now()).expect("legal");
        assert_eq!(e.status, EnrollmentStatus::Approved);
        assert_eq!(e.approved_date, Some(now()));
    }

    #[test]
    fn completion_requires_approval_first() {
        let mut e = enrollment("enr-1", None);
        match e.transition(EnrollmentStatus::Completed, None, now()) {
            Err(EnrollmentError::InvalidTransition { from, to }) => {
                assert_eq!(from, EnrollmentStatus::Pending);
                assert_eq!(to, EnrollmentStatus::Completed);
            }
            other => panic!("expected invalid transition, got {other:?}"),
        }

        e.transition(EnrollmentStatus::Approved, None, now()).expect("legal");
        e.transition(EnrollmentStatus::Completed, None, now()).expect("legal");
        assert_eq!(e.status, EnrollmentStatus::Completed);
    }

    #[test]
    fn rejected_enrollments_cannot_be_approved() {
        let mut e = enrollment("enr-1", None);
        e.transition(EnrollmentStatus::Rejected, None, now()).expect("legal");
        assert!(matches!(
            e.transition(EnrollmentStatus::Approved, None, now()),
            Err(EnrollmentError::InvalidTransition { .. })
        ));
        assert_eq!(e.approved_date, None);
    }

    #[test]
    fn re_approving_fails() {
        let mut e = enrollment("enr-1", None);
        e.transition(EnrollmentStatus::Approved, None, now()).expect("legal");
        assert!(matches!(
            e.transition(EnrollmentStatus::Approved, None, now()),
            Err(EnrollmentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn empty_reviewer_notes_leave_existing_notes() {
        let mut e = enrollment("enr-1", None);
        e.transition(EnrollmentStatus::Approved, Some(String::new()), now())
            .expect("legal");
        assert_eq!(e.notes, "motivation");

        let mut e = enrollment("enr-2", None);
        e.transition(
            EnrollmentStatus::Approved,
            Some("great fit".to_string()),
            now(),
        )
        .expect("legal");
        assert_eq!(e.notes, "great fit");
    }

    #[test]
    fn feedback_checks_rating_before_status() {
        let mut e = enrollment("enr-1", None);
        assert_eq!(
            e.attach_feedback(6, "great".to_string(), now()),
            Err(EnrollmentError::InvalidRating(6))
        );
        assert_eq!(
            e.attach_feedback(0, "great".to_string(), now()),
            Err(EnrollmentError::InvalidRating(0))
        );
        assert_eq!(
            e.attach_feedback(5, "great".to_string(), now()),
            Err(EnrollmentError::NotCompleted {
                status: EnrollmentStatus::Pending
            })
        );
        assert!(e.feedback.is_none());
    }

    #[test]
    fn feedback_attaches_on_completed() {
        let mut e = enrollment("enr-1", None);
        e.transition(EnrollmentStatus::Approved, None, now()).expect("legal");
        e.transition(EnrollmentStatus::Completed, None, now()).expect("legal");
        let feedback = e
            .attach_feedback(5, "great".to_string(), now())
            .expect("completed enrollment accepts feedback");
        assert_eq!(feedback.rating, 5);
        assert_eq!(e.feedback, Some(feedback));
    }

    #[test]
    fn duplicate_key_distinguishes_program_presence() {
        let mut profile = StudentProfile::new(
            UserId::parse("ccccccccccccccccccccccc1").expect("well-formed"),
        );
        profile.enrollments.push(enrollment("enr-1", None));

        assert!(profile.has_application(&mentor(), None));
        assert!(!profile.has_application(&mentor(), Some(&program())));

        profile.enrollments.push(enrollment("enr-2", Some(program())));
        assert!(profile.has_application(&mentor(), Some(&program())));
    }

    #[test]
    fn career_interest_insert_is_idempotent() {
        let mut profile = StudentProfile::new(
            UserId::parse("ccccccccccccccccccccccc1").expect("well-formed"),
        );
        assert!(profile.add_career_interest(program()));
        assert!(!profile.add_career_interest(program()));
        assert_eq!(profile.career_interests.len(), 1);
    }

    #[test]
    fn first_match_honors_insertion_order() {
        let mut profile = StudentProfile::new(
            UserId::parse("ccccccccccccccccccccccc1").expect("well-formed"),
        );
        profile.enrollments.push(enrollment("enr-1", Some(program())));
        profile.enrollments.push(enrollment("enr-2", Some(program())));

        let selector = ReviewSelector::Program(program());
        let found = profile
            .first_match_mut(&mentor(), &selector, EnrollmentStatus::Pending)
            .expect("a pending match exists");
        assert_eq!(found.id.0, "enr-1");
    }
}
