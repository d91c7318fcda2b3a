//! Entity records - students, teachers and class sections
//!
//! Students own no associations. A class section owns its enrolled
//! students and a teacher owns the sections they teach; the owning side
//! rewrites the junction rows whenever it is saved.

pub mod section;
pub mod student;
pub mod teacher;

pub use section::ClassSection;
pub use student::Student;
pub use teacher::Teacher;

/// `#3` for persisted records, `(unsaved)` otherwise
pub(crate) fn display_id(id: Option<i64>) -> String {
    match id {
        Some(id) => format!("#{id}"),
        None => "(unsaved)".to_string(),
    }
}
