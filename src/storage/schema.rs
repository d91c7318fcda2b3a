//! Database schema definitions

/// SQL to create the students table
pub const CREATE_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    gpa REAL NOT NULL
)
"#;

/// SQL to create the teachers table
pub const CREATE_TEACHERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS teachers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
"#;

/// SQL to create the class_sections table
/// `teacher_id` is kept for compatibility; the link lives in teacher_sections
pub const CREATE_CLASS_SECTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS class_sections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    length INTEGER NOT NULL,
    teacher_id INTEGER,
    FOREIGN KEY (teacher_id) REFERENCES teachers(id)
)
"#;

/// SQL to create the teacher_sections junction table
pub const CREATE_TEACHER_SECTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS teacher_sections (
    teacher_id INTEGER,
    section_id INTEGER,
    PRIMARY KEY (teacher_id, section_id),
    FOREIGN KEY (teacher_id) REFERENCES teachers(id),
    FOREIGN KEY (section_id) REFERENCES class_sections(id)
)
"#;

/// SQL to create the section_students junction table
pub const CREATE_SECTION_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS section_students (
    section_id INTEGER,
    student_id INTEGER,
    PRIMARY KEY (section_id, student_id),
    FOREIGN KEY (section_id) REFERENCES class_sections(id),
    FOREIGN KEY (student_id) REFERENCES students(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_teacher_sections_section ON teacher_sections(section_id)",
    "CREATE INDEX IF NOT EXISTS idx_section_students_student ON section_students(student_id)",
];

/// Every table the record layer relies on
pub const TABLES: &[&str] = &[
    "students",
    "teachers",
    "class_sections",
    "teacher_sections",
    "section_students",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_STUDENTS_TABLE,
        CREATE_TEACHERS_TABLE,
        CREATE_CLASS_SECTIONS_TABLE,
        CREATE_TEACHER_SECTIONS_TABLE,
        CREATE_SECTION_STUDENTS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
