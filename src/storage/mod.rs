//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - students(id, name, gpa)
//! - teachers(id, name)
//! - class_sections(id, length, teacher_id)
//! - teacher_sections(teacher_id, section_id)
//! - section_students(section_id, student_id)

pub mod junction;
pub mod schema;
pub mod sqlite;

pub use junction::{Junction, SECTION_STUDENTS, TEACHER_SECTIONS};
pub use sqlite::{DbStats, SqliteStore};
