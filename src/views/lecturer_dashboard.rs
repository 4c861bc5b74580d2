use crate::api::ApiClient;
use crate::course::CourseRecord;
use crate::mock;
use crate::session::SessionStore;

use super::{resolve_fetch, Screen, ViewModel};

pub const MOCK_BANNER: &str = "Unable to reach the API. Showing mock courses.";

pub struct LecturerDashboard;

impl LecturerDashboard {
    /// Fetch the lecturer's courses, mock-backed on any failure.
    pub async fn load(
        api: &ApiClient,
        session: &mut SessionStore,
        screen: &Screen,
    ) -> Option<ViewModel<Vec<CourseRecord>>> {
        let token = session.token().unwrap_or_default().to_string();
        let fetched = api.lecturer_courses(&token).await;

        resolve_fetch(session, screen, fetched, mock::lecturer_courses, MOCK_BANNER)
    }
}
