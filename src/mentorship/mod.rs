//! Enrollment lifecycle core: application intake, mentor resolution, review
//! transitions, completion, and post-completion feedback.

pub mod domain;
pub mod resolver;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{
    Enrollment, EnrollmentError, EnrollmentId, EnrollmentStatus, Feedback, MalformedId, ProgramId,
    ResumeRef, ReviewSelector, UserId,
};
pub use resolver::{MentorResolver, ResolveError};
pub use router::mentorship_router;
pub use service::{
    ApplicationRequest, MentorshipService, ResumeUpload, ReviewDecision, ReviewTarget,
    ServiceError,
};
pub use store::{EnrollmentDraft, EnrollmentStore, InMemoryEnrollmentStore, StoreError};
