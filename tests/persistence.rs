// File-backed persistence across store close/reopen cycles

use school_manager::{ClassSection, LoadDepth, Record, SqliteStore, Student, Teacher};

fn open_temp() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("school.db");
    (dir, path)
}

#[test]
fn test_teacher_graph_survives_reopen() {
    let (_dir, path) = open_temp();

    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.initialize_schema().unwrap();

        let mut ada = Student::new("Ada", 3.9);
        assert_eq!(ada.save(&mut store).unwrap(), 1);

        let mut grace = Teacher::new("Grace");
        assert_eq!(grace.save(&mut store).unwrap(), 1);

        let mut section = ClassSection::new(50);
        assert_eq!(section.save(&mut store).unwrap(), 1);

        section.add_student(ada).unwrap();
        section.save(&mut store).unwrap();

        // Re-read so the teacher holds the section with its enrollment
        let section = ClassSection::find_by_id(&mut store, 1).unwrap().unwrap();
        grace.add_section(section).unwrap();
        grace.save(&mut store).unwrap();

        store.close().unwrap();
    }

    let mut store = SqliteStore::open(&path).unwrap();
    let teacher = Teacher::find_by_id(&mut store, 1).unwrap().unwrap();
    assert_eq!(teacher.name(), "Grace");
    assert_eq!(teacher.sections().len(), 1);

    let section = teacher.sections().get(1).unwrap();
    assert_eq!(section.length(), 50);
    assert_eq!(section.students().len(), 1);

    let student = section.students().get(1).unwrap();
    assert_eq!(student.name(), "Ada");
    assert_eq!(student.gpa(), 3.9);
}

#[test]
fn test_association_set_is_exactly_last_save() {
    let (_dir, path) = open_temp();
    let mut store = SqliteStore::open(&path).unwrap();

    let mut sections = Vec::new();
    for length in [50, 45, 90] {
        let mut section = ClassSection::new(length);
        section.save(&mut store).unwrap();
        sections.push(section);
    }

    let mut teacher = Teacher::new("Grace");
    teacher.add_section(sections[0].clone()).unwrap();
    teacher.add_section(sections[1].clone()).unwrap();
    teacher.save(&mut store).unwrap();

    teacher.remove_section(2);
    teacher.add_section(sections[2].clone()).unwrap();
    teacher.save(&mut store).unwrap();

    store.close().unwrap();

    let reloaded = Teacher::find_by_id(&mut store, 1).unwrap().unwrap();
    assert_eq!(reloaded.section_ids(), vec![1, 3]);
    assert_eq!(store.stats().unwrap().teacher_sections, 2);
}

#[test]
fn test_find_all_depth_override() {
    let (_dir, path) = open_temp();
    let mut store = SqliteStore::open(&path).unwrap();

    let mut ada = Student::new("Ada", 3.9);
    ada.save(&mut store).unwrap();
    let mut section = ClassSection::new(50);
    section.add_student(ada).unwrap();
    section.save(&mut store).unwrap();
    let mut teacher = Teacher::new("Grace");
    teacher.add_section(section).unwrap();
    teacher.save(&mut store).unwrap();

    let flat = Teacher::find_all_with_depth(&mut store, LoadDepth::FLAT).unwrap();
    assert!(flat[0].sections().is_empty());

    let full = Teacher::find_all(&mut store).unwrap();
    assert_eq!(full[0].sections().get(1).unwrap().students().len(), 1);
}

#[test]
fn test_many_sections_and_students_load() {
    let (_dir, path) = open_temp();
    let mut store = SqliteStore::open(&path).unwrap();

    let mut students = Vec::new();
    for i in 0..20_i32 {
        let mut student = Student::new(format!("Student {i}"), 2.0 + f64::from(i) / 10.0);
        student.save(&mut store).unwrap();
        students.push(student);
    }

    let mut teacher = Teacher::new("Grace");
    for _ in 0..10 {
        let mut section = ClassSection::new(50);
        for student in &students {
            section.add_student(student.clone()).unwrap();
        }
        section.save(&mut store).unwrap();
        teacher.add_section(section).unwrap();
    }
    teacher.save(&mut store).unwrap();

    let loaded = Teacher::find_by_id(&mut store, 1).unwrap().unwrap();
    assert_eq!(loaded.sections().len(), 10);
    assert!(loaded.sections().iter().all(|s| s.students().len() == 20));

    let stats = store.stats().unwrap();
    assert_eq!(stats.section_students, 200);
    assert_eq!(stats.teacher_sections, 10);
}
