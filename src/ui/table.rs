use tabled::{settings::Style, Table, Tabled};
use crate::{ClassSection, DbStats, Record, Student, Teacher};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        render(&self.rows)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "GPA")]
    gpa: String,
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Minutes")]
    length: i64,
    #[tabled(rename = "Students")]
    students: String,
}

#[derive(Tabled)]
struct TeacherRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sections")]
    sections: String,
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn students_table(students: &[Student]) -> String {
    let rows: Vec<StudentRow> = students
        .iter()
        .map(|s| StudentRow {
            id: id_cell(s.id()),
            name: s.name().to_string(),
            gpa: format!("{:.2}", s.gpa()),
        })
        .collect();
    render(&rows)
}

pub fn sections_table(sections: &[ClassSection]) -> String {
    let rows: Vec<SectionRow> = sections
        .iter()
        .map(|s| SectionRow {
            id: id_cell(s.id()),
            length: s.length(),
            students: s
                .students()
                .iter()
                .map(|st| st.name().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    render(&rows)
}

pub fn teachers_table(teachers: &[Teacher]) -> String {
    let rows: Vec<TeacherRow> = teachers
        .iter()
        .map(|t| TeacherRow {
            id: id_cell(t.id()),
            name: t.name().to_string(),
            sections: t
                .section_ids()
                .iter()
                .map(|id| format!("#{id}"))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    render(&rows)
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Students", &stats.students.to_string());
    builder.add_row("Teachers", &stats.teachers.to_string());
    builder.add_row("Sections", &stats.class_sections.to_string());
    builder.add_row("Teacher links", &stats.teacher_sections.to_string());
    builder.add_row("Enrollments", &stats.section_students.to_string());
    builder.add_row("Dangling links", &stats.dangling_links.to_string());
    builder.add_row("Average GPA", &format!("{:.2}", stats.average_gpa));
    builder.build()
}
