use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routes::Route;

const STUDENT_SUFFIX: &str = "@student.prasetiyamulya.ac.id";
const CAMPUS_SUFFIX: &str = "@prasetiyamulya.ac.id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
}

impl fmt::Display for Role {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(fmt, "student"),
            Self::Lecturer => write!(fmt, "lecturer"),
        }
    }
}

/// The student domain is a subdomain of the campus domain, so the
/// student suffix must be checked first.
pub fn detect_role_from_email(email: &str) -> Option<Role> {
    let normalized = email.trim().to_ascii_lowercase();

    if normalized.ends_with(STUDENT_SUFFIX) {
        Some(Role::Student)
    } else if normalized.ends_with(CAMPUS_SUFFIX) {
        Some(Role::Lecturer)
    } else {
        None
    }
}

pub fn redirect_path_for_role(role: Option<Role>) -> Route {
    match role {
        Some(Role::Student) => Route::StudentDashboard,
        Some(Role::Lecturer) => Route::LecturerDashboard,
        None => Route::Login,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn student_suffix_wins_over_campus_suffix() {
        assert_eq!(
            detect_role_from_email("aria@student.prasetiyamulya.ac.id"),
            Some(Role::Student),
        );
        assert_eq!(
            detect_role_from_email("maria.santoso@prasetiyamulya.ac.id"),
            Some(Role::Lecturer),
        );
    }

    #[test]
    fn detection_normalizes_case_and_whitespace() {
        assert_eq!(
            detect_role_from_email("  Aria@Student.PRASETIYAMULYA.ac.id \n"),
            Some(Role::Student),
        );
    }

    #[test]
    fn foreign_domains_have_no_role() {
        assert_eq!(detect_role_from_email("someone@gmail.com"), None);
        assert_eq!(detect_role_from_email(""), None);
        assert_eq!(detect_role_from_email("prasetiyamulya.ac.id"), None);
    }

    #[test]
    fn redirect_is_total() {
        assert_eq!(
            redirect_path_for_role(Some(Role::Student)),
            Route::StudentDashboard,
        );
        assert_eq!(
            redirect_path_for_role(Some(Role::Lecturer)),
            Route::LecturerDashboard,
        );
        assert_eq!(redirect_path_for_role(None), Route::Login);
    }
}
