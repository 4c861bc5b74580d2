use crate::api::{ApiClient, RequestError};
use crate::class::ClassRecord;
use crate::mock;
use crate::session::SessionStore;

use super::{resolve_fetch, Screen, ViewModel};

pub const MOCK_BANNER: &str = "Unable to reach the API. Showing mock data.";

pub const WEEKDAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

pub struct StudentDashboard;

impl StudentDashboard {
    /// Fetch the student's classes, mock-backed on any failure. `None`
    /// means the screen went away while the fetch was in flight.
    pub async fn load(
        api: &ApiClient,
        session: &mut SessionStore,
        screen: &Screen,
    ) -> Option<ViewModel<Vec<ClassRecord>>> {
        let token = session.token().unwrap_or_default().to_string();

        let fetched = if token.is_empty() {
            Err(RequestError::new("No authentication token available"))
        } else {
            api.student_classes(&token).await
        };

        resolve_fetch(session, screen, fetched, mock::student_classes, MOCK_BANNER)
    }
}

/// Group classes into a Mon-Fri timetable, keeping fetch order within a
/// day. Classes scheduled outside the weekday grid get their own
/// trailing group; unscheduled ones are skipped.
pub fn timetable(classes: &[ClassRecord]) -> Vec<(String, Vec<ClassRecord>)> {
    let mut days: Vec<(String, Vec<ClassRecord>)> = WEEKDAYS
        .iter()
        .map(|day| (day.to_string(), Vec::new()))
        .collect();

    for class in classes {
        let Some(schedule) = &class.schedule else {
            continue;
        };
        if schedule.day.is_empty() {
            continue;
        }

        match days.iter_mut().find(|(day, _)| *day == schedule.day) {
            Some((_, slot)) => slot.push(class.clone()),
            None => days.push((schedule.day.clone(), vec![class.clone()])),
        }
    }

    days
}
