use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// The three graded components of a class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct GradeSet {
    #[serde(default)]
    pub classwork: f64,
    #[serde(default)]
    pub midterm: f64,
    #[serde(default)]
    pub finals: f64,
}

/// A partial grade update: only the present fields are written, both on
/// the PATCH body and when merging into the mock roster.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct GradePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classwork: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midterm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finals: Option<f64>,
}

impl GradeSet {
    pub fn apply(&mut self, patch: &GradePatch) {
        if let Some(v) = patch.classwork {
            self.classwork = v;
        }
        if let Some(v) = patch.midterm {
            self.midterm = v;
        }
        if let Some(v) = patch.finals {
            self.finals = v;
        }
    }

    pub fn get(&self, field: GradeField) -> f64 {
        match field {
            GradeField::Classwork => self.classwork,
            GradeField::Midterm => self.midterm,
            GradeField::Finals => self.finals,
        }
    }
}

impl From<GradeSet> for GradePatch {
    fn from(grades: GradeSet) -> Self {
        Self {
            classwork: Some(grades.classwork),
            midterm: Some(grades.midterm),
            finals: Some(grades.finals),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeField {
    Classwork,
    Midterm,
    Finals,
}

impl GradeField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Classwork => "classwork",
            Self::Midterm => "midterm",
            Self::Finals => "finals",
        }
    }
}

/// Clamp a typed score to the 0-100 range; empty or non-numeric input
/// yields the fallback unchanged.
pub fn clamp_score(input: &str, fallback: f64) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return fallback;
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n.clamp(MIN_SCORE, MAX_SCORE),
        _ => fallback,
    }
}

/// Scores display the way a number input shows them: no trailing `.0`
/// on whole values.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn out_of_range_scores_clamp_to_the_nearest_bound() {
        assert_eq!(clamp_score("120", 0.0), 100.0);
        assert_eq!(clamp_score("-3", 0.0), 0.0);
        assert_eq!(clamp_score("95", 0.0), 95.0);
        assert_eq!(clamp_score("87.5", 0.0), 87.5);
    }

    #[test]
    fn non_numeric_input_falls_back() {
        assert_eq!(clamp_score("", 42.0), 42.0);
        assert_eq!(clamp_score("  ", 42.0), 42.0);
        assert_eq!(clamp_score("abc", 42.0), 42.0);
        assert_eq!(clamp_score("NaN", 42.0), 42.0);
        assert_eq!(clamp_score("inf", 42.0), 42.0);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut grades = GradeSet {
            classwork: 88.0,
            midterm: 80.0,
            finals: 0.0,
        };
        grades.apply(&GradePatch {
            classwork: Some(95.0),
            ..Default::default()
        });

        assert_eq!(grades.classwork, 95.0);
        assert_eq!(grades.midterm, 80.0);
        assert_eq!(grades.finals, 0.0);
    }

    #[test]
    fn patch_body_omits_absent_fields() {
        let patch = GradePatch {
            midterm: Some(70.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"midterm":70.0}"#);
    }

    #[test]
    fn whole_scores_print_without_a_decimal() {
        assert_eq!(format_score(95.0), "95");
        assert_eq!(format_score(87.5), "87.5");
    }
}
