//! Demo seed used by the binary and handler tests. The ids are fixed so the
//! served API can be exercised with copy-pasteable requests.

use crate::catalog::{InMemoryCatalog, InstructorRef, Program};
use crate::directory::{AccountRole, InMemoryDirectory, User};
use crate::mentorship::domain::{ProgramId, UserId};
use crate::mentorship::store::InMemoryEnrollmentStore;

pub const MENTOR_JANE: &str = "64b0f0a1c2d3e4f5a6b7c801";
pub const MENTOR_MARCUS: &str = "64b0f0a1c2d3e4f5a6b7c802";
pub const STUDENT_SAM: &str = "64b0f0a1c2d3e4f5a6b7c811";
pub const STUDENT_PRIYA: &str = "64b0f0a1c2d3e4f5a6b7c812";
pub const PROGRAM_BACKEND: &str = "64b0f0a1c2d3e4f5a6b7c821";
pub const PROGRAM_DESIGN: &str = "64b0f0a1c2d3e4f5a6b7c822";
pub const PROGRAM_DATA: &str = "64b0f0a1c2d3e4f5a6b7c823";

/// Seeded collaborators ready to be wrapped in `Arc`s and composed into a
/// [`crate::mentorship::service::MentorshipService`].
pub struct DemoData {
    pub directory: InMemoryDirectory,
    pub catalog: InMemoryCatalog,
    pub store: InMemoryEnrollmentStore,
}

/// Two mentors, two students, and three programs covering each mentor
/// resolution path: explicit assignment, free-text instructor, and "TBD".
pub fn demo() -> DemoData {
    let directory = InMemoryDirectory::from_users(vec![
        user(MENTOR_JANE, "Jane Doe", "jane.doe", AccountRole::Mentor),
        user(MENTOR_MARCUS, "Marcus Lee", "marcus.lee", AccountRole::Mentor),
        user(STUDENT_SAM, "Sam Okafor", "sam.okafor", AccountRole::Student),
        user(STUDENT_PRIYA, "Priya Patel", "priya.patel", AccountRole::Student),
    ]);

    let catalog = InMemoryCatalog::from_programs(vec![
        program(
            PROGRAM_BACKEND,
            "Backend Engineering",
            "Technology",
            "Intermediate",
            "APIs, storage, and operational practice.",
            Some(MENTOR_MARCUS),
            "TBD",
        ),
        program(
            PROGRAM_DESIGN,
            "Product Design",
            "Design",
            "Beginner",
            "Research, prototyping, and critique.",
            None,
            "Jane",
        ),
        program(
            PROGRAM_DATA,
            "Data Analytics",
            "Technology",
            "Beginner",
            "From spreadsheets to pipelines.",
            None,
            "TBD",
        ),
    ]);

    DemoData {
        directory,
        catalog,
        store: InMemoryEnrollmentStore::new(),
    }
}

fn user(id: &str, full_name: &str, handle: &str, role: AccountRole) -> User {
    User {
        id: well_formed_user(id),
        full_name: full_name.to_string(),
        email: format!("{handle}@example.com"),
        phone: "555-0100".to_string(),
        role,
    }
}

#[allow(clippy::too_many_arguments)]
fn program(
    id: &str,
    title: &str,
    category: &str,
    level: &str,
    description: &str,
    assigned_mentor: Option<&str>,
    instructor: &str,
) -> Program {
    Program {
        id: well_formed_program(id),
        title: title.to_string(),
        category: category.to_string(),
        level: level.to_string(),
        description: description.to_string(),
        assigned_mentor: assigned_mentor.map(well_formed_user),
        instructor: InstructorRef::classify(instructor),
    }
}

// Seed ids are fixed 24-hex literals, so parsing cannot fail.
fn well_formed_user(id: &str) -> UserId {
    match UserId::parse(id) {
        Ok(id) => id,
        Err(err) => unreachable!("seed user id: {err}"),
    }
}

fn well_formed_program(id: &str) -> ProgramId {
    match ProgramId::parse(id) {
        Ok(id) => id,
        Err(err) => unreachable!("seed program id: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProgramCatalog;
    use crate::directory::IdentityDirectory;

    #[test]
    fn seed_covers_each_resolution_path() {
        let data = demo();

        let mentors = data.directory.mentors().expect("mentors");
        assert_eq!(mentors.len(), 2);

        let backend = data
            .catalog
            .find_program(&ProgramId::parse(PROGRAM_BACKEND).expect("id"))
            .expect("lookup")
            .expect("present");
        assert!(backend.assigned_mentor.is_some());

        let design = data
            .catalog
            .find_program(&ProgramId::parse(PROGRAM_DESIGN).expect("id"))
            .expect("lookup")
            .expect("present");
        assert!(matches!(design.instructor, InstructorRef::Name(_)));

        let data_program = data
            .catalog
            .find_program(&ProgramId::parse(PROGRAM_DATA).expect("id"))
            .expect("lookup")
            .expect("present");
        assert_eq!(data_program.instructor, InstructorRef::Unassigned);
        assert!(data_program.assigned_mentor.is_none());
    }
}
