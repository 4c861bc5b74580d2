use std::collections::HashMap;

use log::warn;

use crate::api::ApiClient;
use crate::course::StudentRecord;
use crate::grades::{clamp_score, format_score, GradeField, GradePatch, GradeSet, MAX_SCORE, MIN_SCORE};
use crate::mock;
use crate::session::SessionStore;

use super::{resolve_fetch, DataSource, Screen, ViewModel};

pub const MOCK_BANNER: &str = "Unable to reach the API. Showing mock students.";
pub const SAVED_STATUS: &str = "Grades updated successfully.";
pub const SAVED_LOCALLY_STATUS: &str = "API unavailable. Saved changes locally.";

pub struct CourseDetail;

impl CourseDetail {
    /// Fetch a course roster, falling back to the mock roster for that
    /// course id (possibly empty) on any failure.
    pub async fn load(
        api: &ApiClient,
        session: &mut SessionStore,
        screen: &Screen,
        course_id: &str,
    ) -> Option<ViewModel<Vec<StudentRecord>>> {
        let token = session.token().unwrap_or_default().to_string();
        let fetched = api.course_students(course_id, &token).await;

        resolve_fetch(
            session,
            screen,
            fetched,
            || mock::course_students(course_id),
            MOCK_BANNER,
        )
    }
}

/// Uncommitted per-student grade edits, kept apart from the roster
/// until Save.
#[derive(Debug, Default)]
pub struct GradeEditor {
    drafts: HashMap<String, HashMap<GradeField, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveOutcome {
    pub grades: GradeSet,
    pub source: DataSource,
    pub status: &'static str,
}

impl GradeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror of the grade input box: empty input stays empty while
    /// typing, numeric input is clamped on the spot, anything else
    /// passes through untouched.
    pub fn record_input(&mut self, student_id: &str, field: GradeField, raw: &str) {
        let next = if raw.is_empty() {
            String::new()
        } else {
            match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => format_score(n.clamp(MIN_SCORE, MAX_SCORE)),
                _ => raw.to_string(),
            }
        };

        self.drafts
            .entry(student_id.to_string())
            .or_default()
            .insert(field, next);
    }

    pub fn draft(&self, student_id: &str, field: GradeField) -> Option<&str> {
        self.drafts
            .get(student_id)?
            .get(&field)
            .map(String::as_str)
    }

    pub fn clear(&mut self, student_id: &str) {
        self.drafts.remove(student_id);
    }

    /// The grades a Save would commit: each field resolved from the
    /// draft, falling back to the committed value.
    pub fn payload(&self, student_id: &str, committed: &GradeSet) -> GradeSet {
        let resolve = |field: GradeField| match self.draft(student_id, field) {
            Some(raw) => clamp_score(raw, committed.get(field)),
            None => committed.get(field),
        };

        GradeSet {
            classwork: resolve(GradeField::Classwork),
            midterm: resolve(GradeField::Midterm),
            finals: resolve(GradeField::Finals),
        }
    }

    /// Try to save a student's grades. Success commits into the roster
    /// entry and drops the draft; failure writes the same grades into
    /// the mock roster instead and keeps the draft around.
    pub async fn save(
        &mut self,
        api: &ApiClient,
        session: &mut SessionStore,
        course_id: &str,
        student: &mut StudentRecord,
    ) -> SaveOutcome {
        let grades = self.payload(&student.id, &student.grades);
        let patch = GradePatch::from(grades);
        let token = session.token().unwrap_or_default().to_string();

        match api
            .update_grades(course_id, &student.id, &patch, &token)
            .await
        {
            Ok(_) => {
                session.set_using_mock_data(false);
                student.grades = grades;
                self.clear(&student.id);

                SaveOutcome {
                    grades,
                    source: DataSource::Server,
                    status: SAVED_STATUS,
                }
            }
            Err(e) => {
                warn!("grade update failed, saving locally: {e}");
                session.set_using_mock_data(true);

                if let Some(updated) = mock::update_mock_grade(course_id, &student.id, &patch) {
                    student.grades = updated.grades;
                }

                SaveOutcome {
                    grades: student.grades,
                    source: DataSource::Mock,
                    status: SAVED_LOCALLY_STATUS,
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use tempfile::TempDir;

    use crate::api::test::DEAD_BASE_URL;
    use crate::views::test::store;

    #[test]
    fn typing_clamps_numbers_and_passes_text_through() {
        let mut editor = GradeEditor::new();

        editor.record_input("STU1", GradeField::Classwork, "120");
        assert_eq!(editor.draft("STU1", GradeField::Classwork), Some("100"));

        editor.record_input("STU1", GradeField::Classwork, "-5");
        assert_eq!(editor.draft("STU1", GradeField::Classwork), Some("0"));

        editor.record_input("STU1", GradeField::Midterm, "87.5");
        assert_eq!(editor.draft("STU1", GradeField::Midterm), Some("87.5"));

        // in-progress typing
        editor.record_input("STU1", GradeField::Finals, "");
        assert_eq!(editor.draft("STU1", GradeField::Finals), Some(""));

        editor.record_input("STU1", GradeField::Finals, "9e");
        assert_eq!(editor.draft("STU1", GradeField::Finals), Some("9e"));
    }

    #[test]
    fn payload_falls_back_to_committed_values() {
        let committed = GradeSet {
            classwork: 88.0,
            midterm: 80.0,
            finals: 0.0,
        };

        let mut editor = GradeEditor::new();
        editor.record_input("STU1", GradeField::Classwork, "95");
        editor.record_input("STU1", GradeField::Finals, ""); // left mid-edit

        let payload = editor.payload("STU1", &committed);
        assert_eq!(payload.classwork, 95.0);
        assert_eq!(payload.midterm, 80.0); // no draft at all
        assert_eq!(payload.finals, 0.0); // empty draft falls back too
    }

    #[test]
    fn drafts_are_per_student() {
        let mut editor = GradeEditor::new();
        editor.record_input("STU1", GradeField::Classwork, "95");

        assert_eq!(editor.draft("STU2", GradeField::Classwork), None);

        editor.clear("STU1");
        assert_eq!(editor.draft("STU1", GradeField::Classwork), None);
    }

    #[tokio::test]
    async fn failed_save_lands_in_the_mock_roster() {
        let dir = TempDir::new().unwrap();
        let mut session = store(&dir);
        let api = ApiClient::new(DEAD_BASE_URL);

        let mut student = mock::course_students("CRS100")
            .into_iter()
            .find(|s| s.id == "STU1")
            .unwrap();

        let mut editor = GradeEditor::new();
        editor.record_input("STU1", GradeField::Classwork, "95");

        let outcome = editor
            .save(&api, &mut session, "CRS100", &mut student)
            .await;

        assert_eq!(outcome.status, SAVED_LOCALLY_STATUS);
        assert_eq!(outcome.source, DataSource::Mock);
        assert!(session.using_mock_data());

        // the mock roster took the write; the other fields kept their values
        let saved = mock::course_students("CRS100")
            .into_iter()
            .find(|s| s.id == "STU1")
            .unwrap();
        assert_eq!(saved.grades.classwork, 95.0);
        assert_eq!(saved.grades.midterm, 80.0);
        assert_eq!(student.grades.classwork, 95.0);

        // a failed save keeps the draft
        assert_eq!(editor.draft("STU1", GradeField::Classwork), Some("95"));
    }

    #[tokio::test]
    async fn failed_save_for_an_unknown_student_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = store(&dir);
        let api = ApiClient::new(DEAD_BASE_URL);

        let mut student = StudentRecord {
            id: "STU999".into(),
            name: "Nobody".into(),
            email: String::new(),
            grades: GradeSet::default(),
        };

        let outcome = GradeEditor::new()
            .save(&api, &mut session, "CRS100", &mut student)
            .await;

        assert_eq!(outcome.status, SAVED_LOCALLY_STATUS);
        assert_eq!(student.grades, GradeSet::default());
    }

    #[tokio::test]
    async fn loading_an_unknown_course_shows_an_empty_mock_roster() {
        let dir = TempDir::new().unwrap();
        let mut session = store(&dir);
        let api = ApiClient::new(DEAD_BASE_URL);

        let vm = CourseDetail::load(&api, &mut session, &Screen::new(), "CRS999")
            .await
            .unwrap();

        assert!(vm.is_mock());
        assert_eq!(vm.banner, Some(MOCK_BANNER));
        assert!(vm.data.is_empty());
    }
}
