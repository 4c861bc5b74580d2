//! The bundled fallback dataset, shown whenever the live API can't be
//! reached. The rosters are process-wide mutable state so that grades
//! "saved locally" stay visible for the rest of the run.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::class::{ClassRecord, Schedule};
use crate::course::{CourseRecord, Enrollment, StudentRecord};
use crate::grades::{GradePatch, GradeSet};

static ROSTERS: LazyLock<Mutex<HashMap<String, Vec<StudentRecord>>>> =
    LazyLock::new(|| Mutex::new(seed_rosters()));

fn rosters() -> MutexGuard<'static, HashMap<String, Vec<StudentRecord>>> {
    ROSTERS.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn student_classes() -> Vec<ClassRecord> {
    vec![
        class(
            "CLS123",
            "DBT201",
            "Data & Business Technology",
            "Dr. Maria Santoso",
            ("Mon", "09:00", "10:30", "B201"),
            (85.0, 78.0, 90.0),
        ),
        class(
            "CLS456",
            "AIR220",
            "Robotics Fundamentals",
            "Dr. Nathan Sunaryo",
            ("Wed", "13:00", "15:00", "Lab 3"),
            (92.0, 88.0, 94.0),
        ),
        class(
            "CLS789",
            "PDI105",
            "Design Thinking Studio",
            "Dr. Carla Irawan",
            ("Fri", "08:30", "10:00", "Studio 1"),
            (80.0, 82.0, 86.0),
        ),
    ]
}

pub fn lecturer_courses() -> Vec<CourseRecord> {
    vec![
        course("CRS100", "AIR210", "Introduction to AI Systems", "LAB-1", "Tue 10:00", 28),
        course("CRS200", "DBT330", "Data Integration & APIs", "B304", "Thu 14:00", 32),
        course("CRS300", "PDI250", "Product Strategy Workshop", "Studio 5", "Fri 09:00", 18),
    ]
}

/// The roster for a course; unknown courses get an empty one.
pub fn course_students(course_id: &str) -> Vec<StudentRecord> {
    rosters().get(course_id).cloned().unwrap_or_default()
}

/// Merge a grade patch into the shared roster. Unknown course or
/// student is a no-op reported as `None`.
pub fn update_mock_grade(
    course_id: &str,
    student_id: &str,
    patch: &GradePatch,
) -> Option<StudentRecord> {
    let mut rosters = rosters();
    let students = rosters.get_mut(course_id)?;
    let student = students.iter_mut().find(|s| s.id == student_id)?;

    student.grades.apply(patch);
    Some(student.clone())
}

fn seed_rosters() -> HashMap<String, Vec<StudentRecord>> {
    let mut rosters = HashMap::new();

    rosters.insert(
        "CRS100".to_string(),
        vec![
            student("STU1", "Aria Hartanto", "aria", (88.0, 80.0, 0.0)),
            student("STU2", "Jonathan Situmorang", "jonathan", (90.0, 83.0, 0.0)),
        ],
    );
    rosters.insert(
        "CRS200".to_string(),
        vec![student("STU7", "Marcell Leo", "marcell", (75.0, 70.0, 0.0))],
    );
    rosters.insert(
        "CRS300".to_string(),
        vec![student("STU8", "Klara Halim", "klara", (95.0, 91.0, 0.0))],
    );

    rosters
}

fn class(
    id: &str,
    code: &str,
    name: &str,
    lecturer: &str,
    (day, start, end, room): (&str, &str, &str, &str),
    (classwork, midterm, finals): (f64, f64, f64),
) -> ClassRecord {
    ClassRecord {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        lecturer: lecturer.to_string(),
        schedule: Some(Schedule {
            day: day.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            room: room.to_string(),
        }),
        grades: GradeSet {
            classwork,
            midterm,
            finals,
        },
    }
}

fn course(id: &str, code: &str, name: &str, room: &str, next_session: &str, students: i64) -> CourseRecord {
    CourseRecord {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        room: room.to_string(),
        next_session: next_session.to_string(),
        students: Enrollment::Count(students as f64),
    }
}

fn student(
    id: &str,
    name: &str,
    mailbox: &str,
    (classwork, midterm, finals): (f64, f64, f64),
) -> StudentRecord {
    StudentRecord {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{mailbox}@student.prasetiyamulya.ac.id"),
        grades: GradeSet {
            classwork,
            midterm,
            finals,
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn seeds_cover_every_course() {
        for course in lecturer_courses() {
            assert!(
                !course_students(&course.id).is_empty(),
                "no roster for {}",
                course.id,
            );
        }
        assert_eq!(student_classes().len(), 3);
    }

    #[test]
    fn unknown_course_has_an_empty_roster() {
        assert!(course_students("CRS999").is_empty());
    }

    #[test]
    fn patching_merges_into_the_shared_roster() {
        let patch = GradePatch {
            midterm: Some(85.0),
            ..Default::default()
        };
        let updated = update_mock_grade("CRS300", "STU8", &patch).unwrap();

        assert_eq!(updated.grades.midterm, 85.0);
        assert_eq!(updated.grades.classwork, 95.0);

        // the mutation sticks
        let roster = course_students("CRS300");
        assert_eq!(roster[0].grades.midterm, 85.0);
    }

    #[test]
    fn patching_a_missing_target_is_a_noop() {
        let patch = GradePatch {
            finals: Some(50.0),
            ..Default::default()
        };
        assert_eq!(update_mock_grade("CRS999", "STU1", &patch), None);
        assert_eq!(update_mock_grade("CRS200", "STU999", &patch), None);

        let roster = course_students("CRS200");
        assert_eq!(roster[0].grades.finals, 0.0);
    }
}
