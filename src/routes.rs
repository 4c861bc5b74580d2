use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::role::{redirect_path_for_role, Role};
use crate::user::UserRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    StudentDashboard,
    LecturerDashboard,
    Course(String),
    Logout,
}

impl FromStr for Route {
    type Err = Infallible;

    // Unknown paths fall through to the landing route, which the guard
    // then redirects - the catch-all.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim_end_matches('/');

        Ok(match trimmed {
            "" | "/" => Self::Landing,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard/student" => Self::StudentDashboard,
            "/dashboard/lecturer" => Self::LecturerDashboard,
            "/logout" => Self::Logout,
            _ => match trimmed.strip_prefix("/courses/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::Course(id.to_string())
                }
                _ => Self::Landing,
            },
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Landing => write!(fmt, "/"),
            Self::Login => write!(fmt, "/login"),
            Self::Register => write!(fmt, "/register"),
            Self::StudentDashboard => write!(fmt, "/dashboard/student"),
            Self::LecturerDashboard => write!(fmt, "/dashboard/lecturer"),
            Self::Course(id) => write!(fmt, "/courses/{id}"),
            Self::Logout => write!(fmt, "/logout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
    /// `from` preserves the originally requested location. The login
    /// flow does not navigate back to it on success - it always routes
    /// by role default.
    RedirectToLogin { from: Route },
}

/// Route guard: anonymous visitors are sent to login, authenticated
/// visitors outside their role's allowed set are sent to their own
/// dashboard.
pub fn resolve(route: &Route, user: Option<&UserRecord>) -> Resolution {
    let role = user.and_then(|u| u.role);

    match route {
        Route::Logout => Resolution::Render(Route::Logout),

        // login and register are unguarded, even for signed-in visitors
        Route::Login | Route::Register => Resolution::Render(route.clone()),

        Route::Landing => match user {
            None => Resolution::RedirectToLogin {
                from: Route::Landing,
            },
            Some(_) => Resolution::Redirect(redirect_path_for_role(role)),
        },

        Route::StudentDashboard => match (user, role) {
            (None, _) => Resolution::RedirectToLogin {
                from: route.clone(),
            },
            (Some(_), Some(Role::Student)) => Resolution::Render(route.clone()),
            (Some(_), _) => Resolution::Redirect(redirect_path_for_role(role)),
        },

        Route::LecturerDashboard | Route::Course(_) => match (user, role) {
            (None, _) => Resolution::RedirectToLogin {
                from: route.clone(),
            },
            (Some(_), Some(Role::Lecturer)) => Resolution::Render(route.clone()),
            (Some(_), _) => Resolution::Redirect(redirect_path_for_role(role)),
        },
    }
}
