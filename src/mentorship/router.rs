use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::ProgramCatalog;
use crate::directory::IdentityDirectory;
use crate::mentorship::service::{
    ApplicationRequest, MentorshipService, ResumeUpload, ReviewDecision, ReviewTarget,
    ServiceError,
};
use crate::mentorship::store::EnrollmentStore;

/// Router builder exposing the enrollment endpoints. Every response is
/// wrapped in the `{success, data | message}` envelope.
pub fn mentorship_router<D, C, S>(service: Arc<MentorshipService<D, C, S>>) -> Router
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/mentors/:mentor_id/applications",
            post(apply_to_mentor_handler::<D, C, S>).get(mentor_applications_handler::<D, C, S>),
        )
        .route(
            "/api/v1/mentors/:mentor_id/applications/decision",
            post(decision_handler::<D, C, S>),
        )
        .route(
            "/api/v1/mentors/:mentor_id/applications/complete",
            post(complete_handler::<D, C, S>),
        )
        .route(
            "/api/v1/mentors/:mentor_id/students",
            get(mentor_students_handler::<D, C, S>),
        )
        .route(
            "/api/v1/programs/:program_id/applications",
            post(apply_to_program_handler::<D, C, S>),
        )
        .route(
            "/api/v1/programs/:program_id/mentor",
            get(resolve_mentor_handler::<D, C, S>),
        )
        .route(
            "/api/v1/students/:student_id/programs",
            get(enrolled_programs_handler::<D, C, S>),
        )
        .route(
            "/api/v1/students/:student_id/profile",
            get(profile_handler::<D, C, S>),
        )
        .route(
            "/api/v1/students/:student_id/resume",
            put(resume_handler::<D, C, S>),
        )
        .route(
            "/api/v1/students/:student_id/enrollments/:enrollment_id/feedback",
            post(feedback_handler::<D, C, S>),
        )
        .with_state(service)
}

fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    let payload = json!({
        "success": true,
        "data": data,
    });
    (status, axum::Json(payload)).into_response()
}

fn failure(error: &ServiceError) -> Response {
    let status = match error {
        ServiceError::MentorNotFound
        | ServiceError::ProgramNotFound
        | ServiceError::ProfileNotFound
        | ServiceError::EnrollmentNotFound => StatusCode::NOT_FOUND,
        ServiceError::DuplicateApplication => StatusCode::CONFLICT,
        ServiceError::Validation(_)
        | ServiceError::NoMentorAvailable
        | ServiceError::Enrollment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "success": false,
        "message": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyBody {
    pub student_id: String,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub resume: Option<ResumeUpload>,
}

impl ApplyBody {
    fn into_parts(self) -> (String, ApplicationRequest) {
        (
            self.student_id,
            ApplicationRequest {
                motivation: self.motivation,
                skills: self.skills,
                resume: self.resume,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionBody {
    pub student_id: String,
    #[serde(default)]
    pub enrollment_id: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteBody {
    pub student_id: String,
    #[serde(default)]
    pub enrollment_id: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResumeBody {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackBody {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApplicationFilter {
    pub program_id: Option<String>,
}

fn target_from(
    enrollment_id: Option<String>,
    program_id: Option<String>,
) -> Result<ReviewTarget, ServiceError> {
    match (enrollment_id, program_id) {
        (Some(id), _) => Ok(ReviewTarget::Enrollment(id)),
        (None, Some(id)) => Ok(ReviewTarget::Program(id)),
        (None, None) => Err(ServiceError::Validation(
            "either enrollment_id or program_id is required".to_string(),
        )),
    }
}

pub(crate) async fn apply_to_mentor_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(mentor_id): Path<String>,
    axum::Json(body): axum::Json<ApplyBody>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    let (student_id, request) = body.into_parts();
    match service.apply_to_mentor(&student_id, &mentor_id, request) {
        Ok(enrollment) => success(StatusCode::CREATED, enrollment),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn apply_to_program_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(program_id): Path<String>,
    axum::Json(body): axum::Json<ApplyBody>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    let (student_id, request) = body.into_parts();
    match service.apply_to_program(&student_id, &program_id, request) {
        Ok(enrollment) => success(StatusCode::CREATED, enrollment),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn mentor_applications_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(mentor_id): Path<String>,
    Query(filter): Query<ApplicationFilter>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.list_applications_for_mentor(&mentor_id, filter.program_id.as_deref()) {
        Ok(views) => success(StatusCode::OK, views),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn decision_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(mentor_id): Path<String>,
    axum::Json(body): axum::Json<DecisionBody>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    let target = match target_from(body.enrollment_id, body.program_id) {
        Ok(target) => target,
        Err(error) => return failure(&error),
    };
    match service.review_application(&mentor_id, &body.student_id, target, body.decision, body.notes)
    {
        Ok(enrollment) => success(StatusCode::OK, enrollment),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn complete_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(mentor_id): Path<String>,
    axum::Json(body): axum::Json<CompleteBody>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    let target = match target_from(body.enrollment_id, body.program_id) {
        Ok(target) => target,
        Err(error) => return failure(&error),
    };
    match service.complete_application(&mentor_id, &body.student_id, target, body.notes) {
        Ok(enrollment) => success(StatusCode::OK, enrollment),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn mentor_students_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(mentor_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.students_for_mentor(&mentor_id) {
        Ok(views) => success(StatusCode::OK, views),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn resolve_mentor_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(program_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.resolve_program_mentor(&program_id) {
        Ok(mentor) => success(StatusCode::OK, mentor),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn enrolled_programs_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(student_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.list_enrolled_programs(&student_id) {
        Ok(views) => success(StatusCode::OK, views),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn profile_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(student_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.student_profile(&student_id) {
        Ok(view) => success(StatusCode::OK, view),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn resume_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path(student_id): Path<String>,
    axum::Json(body): axum::Json<ResumeBody>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.attach_resume(&student_id, body.url, body.filename) {
        Ok(resume) => success(StatusCode::OK, resume),
        Err(error) => failure(&error),
    }
}

pub(crate) async fn feedback_handler<D, C, S>(
    State(service): State<Arc<MentorshipService<D, C, S>>>,
    Path((student_id, enrollment_id)): Path<(String, String)>,
    axum::Json(body): axum::Json<FeedbackBody>,
) -> Response
where
    D: IdentityDirectory + 'static,
    C: ProgramCatalog + 'static,
    S: EnrollmentStore + 'static,
{
    match service.submit_feedback(&student_id, &enrollment_id, body.rating, body.comment) {
        Ok(feedback) => success(StatusCode::CREATED, feedback),
        Err(error) => failure(&error),
    }
}
