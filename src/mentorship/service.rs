//! Application service composing the directory, catalog, resolver, and
//! enrollment store into the operations the API layer exposes.
//!
//! The service validates identifiers before touching any collaborator, so a
//! malformed request never causes a partial write, and it owns every
//! projection: callers receive scoped views, never whole student profiles.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{ProgramCatalog, ProgramSummary};
use crate::directory::{IdentityDirectory, UserSummary};
use crate::mentorship::domain::{
    Enrollment, EnrollmentError, EnrollmentId, EnrollmentStatus, Feedback, MalformedId,
    ProgramId, ResumeRef, ReviewSelector, UserId,
};
use crate::mentorship::resolver::{MentorResolver, ResolveError};
use crate::mentorship::store::{EnrollmentDraft, EnrollmentStore, StoreError};
use crate::storage::StorageError;

/// Error surface of the application service; every variant is recoverable at
/// the caller boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("mentor not found")]
    MentorNotFound,
    #[error("program not found")]
    ProgramNotFound,
    #[error("student profile not found")]
    ProfileNotFound,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error("an application for this mentor and program already exists")]
    DuplicateApplication,
    #[error("no mentor is available for assignment")]
    NoMentorAvailable,
    #[error(transparent)]
    Enrollment(EnrollmentError),
    #[error("storage unavailable: {0}")]
    Storage(String),
}

impl From<MalformedId> for ServiceError {
    fn from(value: MalformedId) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value.0)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateApplication => Self::DuplicateApplication,
            StoreError::ProfileNotFound => Self::ProfileNotFound,
            StoreError::EnrollmentNotFound => Self::EnrollmentNotFound,
            StoreError::Enrollment(err) => Self::Enrollment(err),
            StoreError::Storage(err) => Self::Storage(err.0),
        }
    }
}

impl From<ResolveError> for ServiceError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::NoMentorAvailable => Self::NoMentorAvailable,
            ResolveError::Storage(err) => Self::Storage(err.0),
        }
    }
}

/// Uploaded-file reference already persisted by the external storage
/// service; the core treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeUpload {
    pub url: String,
    pub filename: String,
}

/// Student-supplied application payload shared by both apply operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationRequest {
    pub motivation: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub resume: Option<ResumeUpload>,
}

/// Mentor decision over a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub const fn status(self) -> EnrollmentStatus {
        match self {
            ReviewDecision::Approved => EnrollmentStatus::Approved,
            ReviewDecision::Rejected => EnrollmentStatus::Rejected,
        }
    }
}

/// How a mentor addresses an application: by enrollment id or by program.
#[derive(Debug, Clone)]
pub enum ReviewTarget {
    Enrollment(String),
    Program(String),
}

/// Projection returned to mentors; exposes nothing beyond the addressed
/// application and a student summary.
#[derive(Debug, Clone, Serialize)]
pub struct MentorApplicationView {
    pub enrollment_id: EnrollmentId,
    pub student_id: UserId,
    pub student: UserSummary,
    pub status: EnrollmentStatus,
    pub applied_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Program-linked enrollment joined with lightweight summaries.
#[derive(Debug, Clone, Serialize)]
pub struct EnrolledProgramView {
    pub enrollment_id: EnrollmentId,
    pub program: ProgramSummary,
    pub mentor: UserSummary,
    pub status: EnrollmentStatus,
    pub applied_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
}

/// The student's own profile with joined summaries.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfileView {
    pub student: UserSummary,
    pub career_interests: Vec<ProgramSummary>,
    pub enrollments: Vec<OwnEnrollmentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeRef>,
}

/// One of the student's own enrollments; joins may be absent when the
/// referenced mentor or program is no longer known.
#[derive(Debug, Clone, Serialize)]
pub struct OwnEnrollmentView {
    pub enrollment_id: EnrollmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramSummary>,
    pub status: EnrollmentStatus,
    pub applied_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub skills: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

/// A mentor's student with that mentor's program-linked enrollments only.
#[derive(Debug, Clone, Serialize)]
pub struct MentorStudentView {
    pub student_id: UserId,
    pub student: UserSummary,
    pub enrollments: Vec<MentorStudentEnrollmentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorStudentEnrollmentView {
    pub enrollment_id: EnrollmentId,
    pub program: ProgramSummary,
    pub status: EnrollmentStatus,
    pub applied_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
}

/// Orchestrator over trait-typed collaborators so tests can substitute any
/// of them with doubles.
pub struct MentorshipService<D, C, S> {
    directory: Arc<D>,
    catalog: Arc<C>,
    store: Arc<S>,
    resolver: MentorResolver<D>,
}

impl<D, C, S> MentorshipService<D, C, S>
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    pub fn new(directory: Arc<D>, catalog: Arc<C>, store: Arc<S>) -> Self {
        let resolver = MentorResolver::new(Arc::clone(&directory));
        Self {
            directory,
            catalog,
            store,
            resolver,
        }
    }

    /// Apply directly to a mentor; no program is involved.
    pub fn apply_to_mentor(
        &self,
        student_id: &str,
        mentor_id: &str,
        request: ApplicationRequest,
    ) -> Result<Enrollment, ServiceError> {
        let student = UserId::parse(student_id)?;
        let mentor = self.require_mentor(mentor_id)?;

        let enrollment = self.store.append_enrollment(
            &student,
            EnrollmentDraft {
                target_mentor: mentor.clone(),
                target_program: None,
                notes: request.motivation,
                skills: request.skills.unwrap_or_default(),
            },
        )?;

        if let Some(upload) = request.resume {
            self.store
                .attach_resume(&student, upload.url, upload.filename)?;
        }

        info!(%student, %mentor, enrollment = %enrollment.id, "mentor application recorded");
        Ok(enrollment)
    }

    /// Apply to a career program; the mentor is resolved from the program.
    pub fn apply_to_program(
        &self,
        student_id: &str,
        program_id: &str,
        request: ApplicationRequest,
    ) -> Result<Enrollment, ServiceError> {
        let student = UserId::parse(student_id)?;
        let program_id = ProgramId::parse(program_id)?;
        let program = self
            .catalog
            .find_program(&program_id)?
            .ok_or(ServiceError::ProgramNotFound)?;

        let mentor = self.resolver.resolve(&program)?;

        let enrollment = self.store.append_enrollment(
            &student,
            EnrollmentDraft {
                target_mentor: mentor.clone(),
                target_program: Some(program_id.clone()),
                notes: request.motivation,
                skills: request.skills.unwrap_or_default(),
            },
        )?;

        // Interest and resume writes happen after the dedup-checked append so
        // a rejected duplicate leaves the profile untouched.
        self.store.add_career_interest(&student, &program_id)?;
        if let Some(upload) = request.resume {
            self.store
                .attach_resume(&student, upload.url, upload.filename)?;
        }

        info!(%student, %mentor, program = %program_id, enrollment = %enrollment.id, "program application recorded");
        Ok(enrollment)
    }

    /// All applications addressed to a mentor, optionally narrowed to one
    /// program, projected down to what a reviewer needs.
    pub fn list_applications_for_mentor(
        &self,
        mentor_id: &str,
        program_id: Option<&str>,
    ) -> Result<Vec<MentorApplicationView>, ServiceError> {
        let mentor = UserId::parse(mentor_id)?;
        let program = program_id.map(ProgramId::parse).transpose()?;

        let rows = self
            .store
            .enrollments_for_mentor(&mentor, program.as_ref())?;

        let mut views = Vec::with_capacity(rows.len());
        for (student_id, enrollment) in rows {
            // The directory is the identity authority; an enrollment whose
            // student it no longer knows cannot be summarized.
            let Some(student) = self.directory.find_user(&student_id)? else {
                continue;
            };
            views.push(MentorApplicationView {
                enrollment_id: enrollment.id,
                student_id,
                student: student.summary(),
                status: enrollment.status,
                applied_date: enrollment.applied_date,
                approved_date: enrollment.approved_date,
                notes: enrollment.notes,
            });
        }
        Ok(views)
    }

    /// Approve or reject a pending application within the mentor's scope.
    pub fn review_application(
        &self,
        mentor_id: &str,
        student_id: &str,
        target: ReviewTarget,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<Enrollment, ServiceError> {
        let mentor = UserId::parse(mentor_id)?;
        let student = UserId::parse(student_id)?;
        let selector = selector_from(&target)?;

        let enrollment = self.store.transition_first_match(
            &student,
            &mentor,
            &selector,
            decision.status(),
            notes,
        )?;

        info!(%student, %mentor, enrollment = %enrollment.id, status = %enrollment.status, "application reviewed");
        Ok(enrollment)
    }

    /// Move an approved application to completed within the mentor's scope.
    pub fn complete_application(
        &self,
        mentor_id: &str,
        student_id: &str,
        target: ReviewTarget,
        notes: Option<String>,
    ) -> Result<Enrollment, ServiceError> {
        let mentor = UserId::parse(mentor_id)?;
        let student = UserId::parse(student_id)?;
        let selector = selector_from(&target)?;

        let enrollment = self.store.transition_first_match(
            &student,
            &mentor,
            &selector,
            EnrollmentStatus::Completed,
            notes,
        )?;

        info!(%student, %mentor, enrollment = %enrollment.id, "enrollment completed");
        Ok(enrollment)
    }

    /// The student's program-linked enrollments joined with program and
    /// mentor summaries.
    pub fn list_enrolled_programs(
        &self,
        student_id: &str,
    ) -> Result<Vec<EnrolledProgramView>, ServiceError> {
        let student = UserId::parse(student_id)?;
        let profile = self
            .store
            .find_profile(&student)?
            .ok_or(ServiceError::ProfileNotFound)?;

        let mut views = Vec::new();
        for enrollment in profile.enrollments {
            let Some(program_id) = enrollment.target_program.as_ref() else {
                continue;
            };
            let Some(program) = self.catalog.find_program(program_id)? else {
                continue;
            };
            let Some(mentor) = self.directory.find_user(&enrollment.target_mentor)? else {
                continue;
            };
            views.push(EnrolledProgramView {
                enrollment_id: enrollment.id,
                program: program.summary(),
                mentor: mentor.summary(),
                status: enrollment.status,
                applied_date: enrollment.applied_date,
                approved_date: enrollment.approved_date,
            });
        }
        Ok(views)
    }

    /// Attach feedback to one of the student's own completed enrollments.
    pub fn submit_feedback(
        &self,
        student_id: &str,
        enrollment_id: &str,
        rating: u8,
        comment: String,
    ) -> Result<Feedback, ServiceError> {
        let student = UserId::parse(student_id)?;
        let enrollment = EnrollmentId(enrollment_id.to_string());

        let feedback = self
            .store
            .attach_feedback(&student, &enrollment, rating, comment)?;

        info!(%student, %enrollment, rating, "feedback submitted");
        Ok(feedback)
    }

    /// The student's own profile with joined interest/enrollment summaries.
    pub fn student_profile(&self, student_id: &str) -> Result<StudentProfileView, ServiceError> {
        let student_id = UserId::parse(student_id)?;
        let student = self
            .directory
            .find_user(&student_id)?
            .ok_or(ServiceError::ProfileNotFound)?;
        let profile = self
            .store
            .find_profile(&student_id)?
            .ok_or(ServiceError::ProfileNotFound)?;

        let mut career_interests = Vec::new();
        for program_id in &profile.career_interests {
            if let Some(program) = self.catalog.find_program(program_id)? {
                career_interests.push(program.summary());
            }
        }

        let mut enrollments = Vec::new();
        for enrollment in profile.enrollments {
            let mentor = self
                .directory
                .find_user(&enrollment.target_mentor)?
                .map(|user| user.summary());
            let program = match enrollment.target_program.as_ref() {
                Some(id) => self.catalog.find_program(id)?.map(|p| p.summary()),
                None => None,
            };
            enrollments.push(OwnEnrollmentView {
                enrollment_id: enrollment.id,
                mentor,
                program,
                status: enrollment.status,
                applied_date: enrollment.applied_date,
                approved_date: enrollment.approved_date,
                notes: enrollment.notes,
                skills: enrollment.skills,
                feedback: enrollment.feedback,
            });
        }

        Ok(StudentProfileView {
            student: student.summary(),
            career_interests,
            enrollments,
            resume: profile.resume,
        })
    }

    /// Replace the student's resume reference, creating the profile lazily.
    pub fn attach_resume(
        &self,
        student_id: &str,
        url: String,
        filename: String,
    ) -> Result<ResumeRef, ServiceError> {
        let student = UserId::parse(student_id)?;
        let resume = self.store.attach_resume(&student, url, filename)?;
        info!(%student, filename = %resume.filename, "resume attached");
        Ok(resume)
    }

    /// Students with program-linked enrollments under this mentor, grouped
    /// per student.
    pub fn students_for_mentor(
        &self,
        mentor_id: &str,
    ) -> Result<Vec<MentorStudentView>, ServiceError> {
        let mentor = UserId::parse(mentor_id)?;
        let rows = self.store.enrollments_for_mentor(&mentor, None)?;

        let mut grouped: BTreeMap<UserId, Vec<Enrollment>> = BTreeMap::new();
        for (student_id, enrollment) in rows {
            if enrollment.target_program.is_none() {
                continue;
            }
            grouped.entry(student_id).or_default().push(enrollment);
        }

        let mut views = Vec::new();
        for (student_id, enrollments) in grouped {
            let Some(student) = self.directory.find_user(&student_id)? else {
                continue;
            };
            let mut enrollment_views = Vec::new();
            for enrollment in enrollments {
                let Some(program_id) = enrollment.target_program.as_ref() else {
                    continue;
                };
                let Some(program) = self.catalog.find_program(program_id)? else {
                    continue;
                };
                enrollment_views.push(MentorStudentEnrollmentView {
                    enrollment_id: enrollment.id,
                    program: program.summary(),
                    status: enrollment.status,
                    applied_date: enrollment.applied_date,
                    approved_date: enrollment.approved_date,
                });
            }
            if enrollment_views.is_empty() {
                continue;
            }
            views.push(MentorStudentView {
                student_id,
                student: student.summary(),
                enrollments: enrollment_views,
            });
        }
        Ok(views)
    }

    /// Preview which mentor an application to `program_id` would route to.
    pub fn resolve_program_mentor(&self, program_id: &str) -> Result<UserSummary, ServiceError> {
        let program_id = ProgramId::parse(program_id)?;
        let program = self
            .catalog
            .find_program(&program_id)?
            .ok_or(ServiceError::ProgramNotFound)?;
        let mentor_id = self.resolver.resolve(&program)?;
        let mentor = self
            .directory
            .find_user(&mentor_id)?
            .ok_or(ServiceError::MentorNotFound)?;
        Ok(mentor.summary())
    }

    /// A target mentor must be a directory user carrying the mentor role.
    fn require_mentor(&self, mentor_id: &str) -> Result<UserId, ServiceError> {
        let mentor = UserId::parse(mentor_id)?;
        match self.directory.find_user(&mentor)? {
            Some(user) if user.is_mentor() => Ok(mentor),
            _ => Err(ServiceError::MentorNotFound),
        }
    }
}

fn selector_from(target: &ReviewTarget) -> Result<ReviewSelector, ServiceError> {
    match target {
        ReviewTarget::Enrollment(raw) => {
            if raw.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "enrollment id must not be empty".to_string(),
                ));
            }
            Ok(ReviewSelector::Enrollment(EnrollmentId(raw.clone())))
        }
        ReviewTarget::Program(raw) => Ok(ReviewSelector::Program(ProgramId::parse(raw)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, InstructorRef, Program};
    use crate::directory::{AccountRole, InMemoryDirectory, User};
    use crate::mentorship::store::InMemoryEnrollmentStore;

    const STUDENT: &str = "ccccccccccccccccccccccc1";
    const OTHER_STUDENT: &str = "ccccccccccccccccccccccc2";
    const MENTOR_JANE: &str = "aaaaaaaaaaaaaaaaaaaaaaa1";
    const MENTOR_MARCUS: &str = "aaaaaaaaaaaaaaaaaaaaaaa2";
    const PROGRAM_TBD: &str = "bbbbbbbbbbbbbbbbbbbbbbb1";
    const PROGRAM_NAMED: &str = "bbbbbbbbbbbbbbbbbbbbbbb2";

    fn user(id: &str, name: &str, role: AccountRole) -> User {
        User {
            id: UserId::parse(id).expect("well-formed"),
            full_name: name.to_string(),
            email: format!("{id}@example.com"),
            phone: "555-0100".to_string(),
            role,
        }
    }

    fn program(id: &str, title: &str, instructor: &str) -> Program {
        Program {
            id: ProgramId::parse(id).expect("well-formed"),
            title: title.to_string(),
            category: "Technology".to_string(),
            level: "Beginner".to_string(),
            description: String::new(),
            assigned_mentor: None,
            instructor: InstructorRef::classify(instructor),
        }
    }

    fn service(
    ) -> MentorshipService<InMemoryDirectory, InMemoryCatalog, InMemoryEnrollmentStore> {
        let directory = Arc::new(InMemoryDirectory::from_users(vec![
            user(STUDENT, "Sam Student", AccountRole::Student),
            user(OTHER_STUDENT, "Priya Patel", AccountRole::Student),
            user(MENTOR_JANE, "Jane Doe", AccountRole::Mentor),
            user(MENTOR_MARCUS, "Marcus Lee", AccountRole::Mentor),
        ]));
        let catalog = Arc::new(InMemoryCatalog::from_programs(vec![
            program(PROGRAM_TBD, "Backend Engineering", "TBD"),
            program(PROGRAM_NAMED, "Product Design", "marcus"),
        ]));
        let store = Arc::new(InMemoryEnrollmentStore::new());
        MentorshipService::new(directory, catalog, store)
    }

    fn request(motivation: &str) -> ApplicationRequest {
        ApplicationRequest {
            motivation: motivation.to_string(),
            skills: Some("rust".to_string()),
            resume: None,
        }
    }

    #[test]
    fn apply_to_mentor_rejects_unknown_and_non_mentor_targets() {
        let service = service();
        assert!(matches!(
            service.apply_to_mentor(STUDENT, "ffffffffffffffffffffffff", request("hi")),
            Err(ServiceError::MentorNotFound)
        ));
        assert!(matches!(
            service.apply_to_mentor(STUDENT, OTHER_STUDENT, request("hi")),
            Err(ServiceError::MentorNotFound)
        ));
        assert!(matches!(
            service.apply_to_mentor(STUDENT, "not-an-id", request("hi")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn second_mentor_application_is_a_duplicate() {
        let service = service();
        service
            .apply_to_mentor(STUDENT, MENTOR_JANE, request("first"))
            .expect("first apply");
        assert!(matches!(
            service.apply_to_mentor(STUDENT, MENTOR_JANE, request("second")),
            Err(ServiceError::DuplicateApplication)
        ));
    }

    #[test]
    fn apply_to_program_resolves_mentor_and_records_interest() {
        let service = service();
        let enrollment = service
            .apply_to_program(STUDENT, PROGRAM_NAMED, request("design"))
            .expect("apply");
        // "marcus" matches Marcus Lee by partial name.
        assert_eq!(enrollment.target_mentor.as_str(), MENTOR_MARCUS);

        let profile = service.student_profile(STUDENT).expect("profile");
        assert_eq!(profile.career_interests.len(), 1);
        assert_eq!(profile.career_interests[0].title, "Product Design");
    }

    #[test]
    fn apply_to_program_is_idempotent_per_program() {
        let service = service();
        service
            .apply_to_program(STUDENT, PROGRAM_TBD, request("go"))
            .expect("first apply");
        assert!(matches!(
            service.apply_to_program(STUDENT, PROGRAM_TBD, request("again")),
            Err(ServiceError::DuplicateApplication)
        ));
    }

    #[test]
    fn apply_to_unknown_program_fails() {
        let service = service();
        assert!(matches!(
            service.apply_to_program(STUDENT, "bbbbbbbbbbbbbbbbbbbbbbbf", request("hi")),
            Err(ServiceError::ProgramNotFound)
        ));
    }

    #[test]
    fn listing_is_scoped_to_the_addressed_mentor() {
        let service = service();
        service
            .apply_to_mentor(STUDENT, MENTOR_JANE, request("jane"))
            .expect("apply");
        service
            .apply_to_mentor(STUDENT, MENTOR_MARCUS, request("marcus"))
            .expect("apply");

        let views = service
            .list_applications_for_mentor(MENTOR_JANE, None)
            .expect("list");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].notes, "jane");
        assert_eq!(views[0].student.full_name, "Sam Student");
    }

    #[test]
    fn review_by_program_approves_the_pending_enrollment() {
        let service = service();
        let enrollment = service
            .apply_to_program(STUDENT, PROGRAM_TBD, request("go"))
            .expect("apply");
        // The TBD program falls back to the first-created mentor.
        assert_eq!(enrollment.target_mentor.as_str(), MENTOR_JANE);

        let reviewed = service
            .review_application(
                MENTOR_JANE,
                STUDENT,
                ReviewTarget::Program(PROGRAM_TBD.to_string()),
                ReviewDecision::Approved,
                Some("welcome aboard".to_string()),
            )
            .expect("review");
        assert_eq!(reviewed.status, EnrollmentStatus::Approved);
        assert_eq!(reviewed.notes, "welcome aboard");
        assert!(reviewed.approved_date.is_some());
    }

    #[test]
    fn review_outside_mentor_scope_is_not_found() {
        let service = service();
        let enrollment = service
            .apply_to_mentor(STUDENT, MENTOR_JANE, request("hi"))
            .expect("apply");

        assert!(matches!(
            service.review_application(
                MENTOR_MARCUS,
                STUDENT,
                ReviewTarget::Enrollment(enrollment.id.0.clone()),
                ReviewDecision::Approved,
                None,
            ),
            Err(ServiceError::EnrollmentNotFound)
        ));
    }

    #[test]
    fn reviewing_an_already_decided_application_is_not_found() {
        let service = service();
        let enrollment = service
            .apply_to_mentor(STUDENT, MENTOR_JANE, request("hi"))
            .expect("apply");
        service
            .review_application(
                MENTOR_JANE,
                STUDENT,
                ReviewTarget::Enrollment(enrollment.id.0.clone()),
                ReviewDecision::Rejected,
                None,
            )
            .expect("first decision");

        assert!(matches!(
            service.review_application(
                MENTOR_JANE,
                STUDENT,
                ReviewTarget::Enrollment(enrollment.id.0.clone()),
                ReviewDecision::Approved,
                None,
            ),
            Err(ServiceError::EnrollmentNotFound)
        ));
    }

    #[test]
    fn completed_enrollment_accepts_feedback() {
        let service = service();
        let enrollment = service
            .apply_to_program(STUDENT, PROGRAM_TBD, request("go"))
            .expect("apply");
        let target = ReviewTarget::Enrollment(enrollment.id.0.clone());
        service
            .review_application(
                MENTOR_JANE,
                STUDENT,
                target.clone(),
                ReviewDecision::Approved,
                None,
            )
            .expect("approve");
        service
            .complete_application(MENTOR_JANE, STUDENT, target, None)
            .expect("complete");

        assert!(matches!(
            service.submit_feedback(STUDENT, &enrollment.id.0, 6, "great".to_string()),
            Err(ServiceError::Enrollment(EnrollmentError::InvalidRating(6)))
        ));

        let feedback = service
            .submit_feedback(STUDENT, &enrollment.id.0, 5, "great".to_string())
            .expect("feedback");
        assert_eq!(feedback.rating, 5);
    }

    #[test]
    fn enrolled_programs_join_program_and_mentor_summaries() {
        let service = service();
        service
            .apply_to_mentor(STUDENT, MENTOR_MARCUS, request("direct"))
            .expect("mentor-only apply");
        service
            .apply_to_program(STUDENT, PROGRAM_TBD, request("go"))
            .expect("program apply");

        let programs = service.list_enrolled_programs(STUDENT).expect("list");
        assert_eq!(programs.len(), 1, "mentor-only applications are excluded");
        assert_eq!(programs[0].program.title, "Backend Engineering");
        assert_eq!(programs[0].mentor.full_name, "Jane Doe");
    }

    #[test]
    fn students_for_mentor_groups_program_enrollments() {
        let service = service();
        service
            .apply_to_program(STUDENT, PROGRAM_TBD, request("go"))
            .expect("apply");
        service
            .apply_to_program(OTHER_STUDENT, PROGRAM_TBD, request("me too"))
            .expect("apply");
        service
            .apply_to_mentor(STUDENT, MENTOR_JANE, request("direct"))
            .expect("mentor-only apply is excluded from the grouping");

        let students = service.students_for_mentor(MENTOR_JANE).expect("list");
        assert_eq!(students.len(), 2);
        for view in &students {
            assert_eq!(view.enrollments.len(), 1);
            assert_eq!(view.enrollments[0].program.title, "Backend Engineering");
        }
    }

    #[test]
    fn profile_lookup_without_interactions_is_not_found() {
        let service = service();
        assert!(matches!(
            service.student_profile(STUDENT),
            Err(ServiceError::ProfileNotFound)
        ));
        assert!(matches!(
            service.list_enrolled_programs(STUDENT),
            Err(ServiceError::ProfileNotFound)
        ));
    }

    #[test]
    fn resume_upload_creates_the_profile_lazily() {
        let service = service();
        let resume = service
            .attach_resume(STUDENT, "https://files/cv.pdf".to_string(), "cv.pdf".to_string())
            .expect("upload");
        assert_eq!(resume.filename, "cv.pdf");

        let profile = service.student_profile(STUDENT).expect("profile now exists");
        assert_eq!(profile.resume.expect("present").filename, "cv.pdf");
    }

    #[test]
    fn resolve_preview_matches_apply_routing() {
        let service = service();
        let preview = service
            .resolve_program_mentor(PROGRAM_NAMED)
            .expect("resolves");
        let enrollment = service
            .apply_to_program(STUDENT, PROGRAM_NAMED, request("go"))
            .expect("apply");
        assert_eq!(preview.id, enrollment.target_mentor);
    }
}
