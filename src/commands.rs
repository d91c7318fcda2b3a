use crate::{OutputMode, SectionAction, StudentAction, TeacherAction, emit_success};
use school_manager::config::{self, SchoolConfig};
use school_manager::ui::{self, Icons};
use school_manager::{ClassSection, Record, SqliteStore, Student, Teacher};
use serde_json::json;
use std::path::Path;

pub fn run_init(config_path: &Path, database: &Path, force: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", config_path.display());
    }

    // The config is only written once the database it names is usable
    config::ensure_db_dir(database)?;
    let mut store = SqliteStore::open(database)?;
    store.initialize_schema()?;
    store.close()?;

    let config = SchoolConfig {
        database: Some(database.to_string_lossy().to_string()),
    };
    config::write_config(config_path, &config, force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
        ui::info("Database", &database.display().to_string());
    } else {
        emit_success(
            output_mode,
            "init",
            json!({ "config": config_path.display().to_string(), "database": config.database }),
        )?;
    }
    Ok(())
}

// ========== Students ==========

pub fn run_student(store: &mut SqliteStore, action: StudentAction, output_mode: OutputMode) -> anyhow::Result<()> {
    match action {
        StudentAction::Add { name, gpa } => {
            let mut student = Student::new(name, gpa);
            let id = student.save(store)?;
            saved(output_mode, "student.add", Student::KIND, id, &student)
        }
        StudentAction::List => {
            let students = Student::find_all(store)?;
            if !output_mode.is_human() {
                return emit_success(output_mode, "student.list", serde_json::to_value(&students)?);
            }
            ui::header(Icons::STUDENT, "All Students");
            print_table(&ui::students_table(&students), "No students.");
            Ok(())
        }
        StudentAction::Show { id } => {
            let Some(student) = Student::find_by_id(store, id)? else {
                return missing(output_mode, "student.show", Student::KIND, id);
            };
            if output_mode.is_human() {
                println!("{student}");
                Ok(())
            } else {
                emit_success(output_mode, "student.show", serde_json::to_value(&student)?)
            }
        }
        StudentAction::Update { id, name, gpa } => {
            let Some(mut student) = Student::find_by_id(store, id)? else {
                return missing(output_mode, "student.update", Student::KIND, id);
            };
            if let Some(name) = name {
                student.set_name(name);
            }
            if let Some(gpa) = gpa {
                student.set_gpa(gpa);
            }
            student.save(store)?;
            saved(output_mode, "student.update", Student::KIND, id, &student)
        }
        StudentAction::Delete { id } => delete::<Student>(store, id, "student.delete", output_mode),
    }
}

// ========== Teachers ==========

pub fn run_teacher(store: &mut SqliteStore, action: TeacherAction, output_mode: OutputMode) -> anyhow::Result<()> {
    match action {
        TeacherAction::Add { name } => {
            let mut teacher = Teacher::new(name);
            let id = teacher.save(store)?;
            saved(output_mode, "teacher.add", Teacher::KIND, id, &teacher)
        }
        TeacherAction::List => {
            let teachers = Teacher::find_all(store)?;
            if !output_mode.is_human() {
                return emit_success(output_mode, "teacher.list", serde_json::to_value(&teachers)?);
            }
            ui::header(Icons::TEACHER, "All Teachers");
            print_table(&ui::teachers_table(&teachers), "No teachers.");
            Ok(())
        }
        TeacherAction::Show { id } => {
            let Some(teacher) = Teacher::find_by_id(store, id)? else {
                return missing(output_mode, "teacher.show", Teacher::KIND, id);
            };
            if !output_mode.is_human() {
                return emit_success(output_mode, "teacher.show", serde_json::to_value(&teacher)?);
            }
            println!("{teacher}");
            for section in teacher.sections().iter() {
                ui::section(&section.to_string());
                for student in section.students().iter() {
                    ui::summary_row("•", &student.to_string());
                }
            }
            Ok(())
        }
        TeacherAction::Rename { id, name } => {
            let Some(mut teacher) = Teacher::find_by_id(store, id)? else {
                return missing(output_mode, "teacher.rename", Teacher::KIND, id);
            };
            teacher.set_name(name);
            teacher.save(store)?;
            saved(output_mode, "teacher.rename", Teacher::KIND, id, &teacher)
        }
        TeacherAction::Assign { teacher_id, section_id } => {
            let Some(mut teacher) = Teacher::find_by_id(store, teacher_id)? else {
                return missing(output_mode, "teacher.assign", Teacher::KIND, teacher_id);
            };
            let Some(section) = ClassSection::find_by_id(store, section_id)? else {
                return missing(output_mode, "teacher.assign", ClassSection::KIND, section_id);
            };

            let added = teacher.add_section(section)?;
            teacher.save(store)?;
            if output_mode.is_human() {
                if added {
                    ui::linked(Teacher::KIND, teacher_id, ClassSection::KIND, section_id);
                } else {
                    ui::warn(&format!("Section {section_id} is already assigned to teacher {teacher_id}"));
                }
                Ok(())
            } else {
                emit_success(output_mode, "teacher.assign", json!({ "changed": added, "teacher": teacher }))
            }
        }
        TeacherAction::Unassign { teacher_id, section_id } => {
            let Some(mut teacher) = Teacher::find_by_id(store, teacher_id)? else {
                return missing(output_mode, "teacher.unassign", Teacher::KIND, teacher_id);
            };

            let removed = teacher.remove_section(section_id).is_some();
            if removed {
                teacher.save(store)?;
            }
            if output_mode.is_human() {
                if removed {
                    ui::unlinked(Teacher::KIND, teacher_id, ClassSection::KIND, section_id);
                } else {
                    ui::warn(&format!("Section {section_id} is not assigned to teacher {teacher_id}"));
                }
                Ok(())
            } else {
                emit_success(output_mode, "teacher.unassign", json!({ "changed": removed, "teacher": teacher }))
            }
        }
        TeacherAction::Delete { id } => delete::<Teacher>(store, id, "teacher.delete", output_mode),
    }
}

// ========== Class sections ==========

pub fn run_section(store: &mut SqliteStore, action: SectionAction, output_mode: OutputMode) -> anyhow::Result<()> {
    match action {
        SectionAction::Add { length } => {
            let mut section = ClassSection::new(length);
            let id = section.save(store)?;
            saved(output_mode, "section.add", ClassSection::KIND, id, &section)
        }
        SectionAction::List => {
            let sections = ClassSection::find_all(store)?;
            if !output_mode.is_human() {
                return emit_success(output_mode, "section.list", serde_json::to_value(&sections)?);
            }
            ui::header(Icons::SECTION, "All Sections");
            print_table(&ui::sections_table(&sections), "No sections.");
            Ok(())
        }
        SectionAction::Show { id } => {
            let Some(section) = ClassSection::find_by_id(store, id)? else {
                return missing(output_mode, "section.show", ClassSection::KIND, id);
            };
            if !output_mode.is_human() {
                return emit_success(output_mode, "section.show", serde_json::to_value(&section)?);
            }
            println!("{section}");
            let students: Vec<Student> = section.students().iter().cloned().collect();
            print_table(&ui::students_table(&students), "No students enrolled.");
            Ok(())
        }
        SectionAction::Update { id, length } => {
            let Some(mut section) = ClassSection::find_by_id(store, id)? else {
                return missing(output_mode, "section.update", ClassSection::KIND, id);
            };
            section.set_length(length);
            section.save(store)?;
            saved(output_mode, "section.update", ClassSection::KIND, id, &section)
        }
        SectionAction::Enroll { section_id, student_id } => {
            let Some(mut section) = ClassSection::find_by_id(store, section_id)? else {
                return missing(output_mode, "section.enroll", ClassSection::KIND, section_id);
            };
            let Some(student) = Student::find_by_id(store, student_id)? else {
                return missing(output_mode, "section.enroll", Student::KIND, student_id);
            };

            let added = section.add_student(student)?;
            section.save(store)?;
            if output_mode.is_human() {
                if added {
                    ui::linked(ClassSection::KIND, section_id, Student::KIND, student_id);
                } else {
                    ui::warn(&format!("Student {student_id} is already enrolled in section {section_id}"));
                }
                Ok(())
            } else {
                emit_success(output_mode, "section.enroll", json!({ "changed": added, "section": section }))
            }
        }
        SectionAction::Drop { section_id, student_id } => {
            let Some(mut section) = ClassSection::find_by_id(store, section_id)? else {
                return missing(output_mode, "section.drop", ClassSection::KIND, section_id);
            };

            let removed = section.remove_student(student_id).is_some();
            if removed {
                section.save(store)?;
            }
            if output_mode.is_human() {
                if removed {
                    ui::unlinked(ClassSection::KIND, section_id, Student::KIND, student_id);
                } else {
                    ui::warn(&format!("Student {student_id} is not enrolled in section {section_id}"));
                }
                Ok(())
            } else {
                emit_success(output_mode, "section.drop", json!({ "changed": removed, "section": section }))
            }
        }
        SectionAction::Delete { id } => delete::<ClassSection>(store, id, "section.delete", output_mode),
    }
}

// ========== Report ==========

pub fn run_report(store: &mut SqliteStore, database: &Path, output_mode: OutputMode) -> anyhow::Result<()> {
    let stats = store.stats()?;
    if !output_mode.is_human() {
        return emit_success(output_mode, "report", serde_json::to_value(&stats)?);
    }

    ui::header(Icons::STATS, &format!("School Report ({})", database.display()));
    println!("{}", ui::stats_table(&stats));
    if stats.dangling_links > 0 {
        ui::warn(&format!(
            "{} link(s) point at deleted records and are hidden from listings",
            stats.dangling_links
        ));
    }
    Ok(())
}

// ========== Helpers ==========

fn delete<R>(store: &mut SqliteStore, id: i64, command: &str, output_mode: OutputMode) -> anyhow::Result<()>
where
    R: Record,
{
    let Some(record) = R::find_by_id_with_depth(store, id, school_manager::LoadDepth::FLAT)? else {
        return missing(output_mode, command, R::KIND, id);
    };
    let removed = record.delete(store)?;

    if output_mode.is_human() {
        println!("{} Deleted {} {}", Icons::DEL, R::KIND, id);
        Ok(())
    } else {
        emit_success(output_mode, command, json!({ "id": id, "deleted": removed }))
    }
}

fn saved<T: serde::Serialize>(
    output_mode: OutputMode,
    command: &str,
    kind: &str,
    id: i64,
    record: &T,
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::saved(kind, id);
        Ok(())
    } else {
        emit_success(output_mode, command, serde_json::to_value(record)?)
    }
}

fn missing(output_mode: OutputMode, command: &str, kind: &str, id: i64) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::not_found(kind, id);
        Ok(())
    } else {
        emit_success(output_mode, command, serde_json::Value::Null)
    }
}

fn print_table(table: &str, empty: &str) {
    if table.is_empty() {
        println!("{} {}", Icons::EMPTY, ui::dim(empty));
    } else {
        println!("{table}");
    }
}
