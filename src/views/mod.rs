//! One controller per screen. The data-bearing screens share a
//! contract: try the API, fall back to the bundled mock dataset on any
//! failure and flag the session accordingly.

pub mod course_detail;
pub mod lecturer_dashboard;
pub mod login;
pub mod register;
pub mod student_dashboard;

pub use course_detail::{CourseDetail, GradeEditor};
pub use lecturer_dashboard::LecturerDashboard;
pub use login::LoginForm;
pub use register::{RegisterError, RegisterForm};
pub use student_dashboard::{timetable, StudentDashboard};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::api::RequestError;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Server,
    Mock,
}

/// What a data screen renders: the records, where they came from, and
/// the banner to show when they're the mock ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel<T> {
    pub data: T,
    pub source: DataSource,
    pub banner: Option<&'static str>,
}

impl<T> ViewModel<T> {
    pub fn is_mock(&self) -> bool {
        self.source == DataSource::Mock
    }
}

/// Mount guard. Loads check it after their fetch resolves and drop the
/// result if the screen has gone away meanwhile - the request itself is
/// never cancelled, only its effect.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    dismounted: Arc<AtomicBool>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismount(&self) {
        self.dismounted.store(true, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        !self.dismounted.load(Ordering::SeqCst)
    }
}

/// The shared success/fallback step: `None` when the screen was
/// dismounted mid-flight, otherwise the view model plus the mock flag
/// toggled on the session.
fn resolve_fetch<T>(
    session: &mut SessionStore,
    screen: &Screen,
    fetched: Result<T, RequestError>,
    mock: impl FnOnce() -> T,
    banner: &'static str,
) -> Option<ViewModel<T>> {
    if !screen.is_active() {
        debug!("screen dismounted, dropping fetch result");
        return None;
    }

    match fetched {
        Ok(data) => {
            session.set_using_mock_data(false);
            Some(ViewModel {
                data,
                source: DataSource::Server,
                banner: None,
            })
        }
        Err(e) => {
            warn!("falling back to mock data: {e}");
            session.set_using_mock_data(true);
            Some(ViewModel {
                data: mock(),
                source: DataSource::Mock,
                banner: Some(banner),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use tempfile::TempDir;

    pub(crate) fn store(dir: &TempDir) -> SessionStore {
        SessionStore::load(dir.path().join("session.json"))
    }

    #[test]
    fn a_dismounted_screen_discards_its_result() {
        let dir = TempDir::new().unwrap();
        let mut session = store(&dir);
        session.set_using_mock_data(true);

        let screen = Screen::new();
        screen.dismount();

        let resolved = resolve_fetch(
            &mut session,
            &screen,
            Ok::<_, RequestError>(vec![1]),
            Vec::new,
            "banner",
        );

        assert_eq!(resolved, None);
        // dropped wholesale: not even the mock flag moves
        assert!(session.using_mock_data());
    }

    #[test]
    fn success_clears_the_mock_flag() {
        let dir = TempDir::new().unwrap();
        let mut session = store(&dir);
        session.set_using_mock_data(true);

        let resolved = resolve_fetch(
            &mut session,
            &Screen::new(),
            Ok::<_, RequestError>(vec![1, 2]),
            Vec::new,
            "banner",
        )
        .unwrap();

        assert_eq!(resolved.source, DataSource::Server);
        assert_eq!(resolved.banner, None);
        assert!(!session.using_mock_data());
    }

    #[test]
    fn failure_swaps_in_the_mock_dataset() {
        let dir = TempDir::new().unwrap();
        let mut session = store(&dir);

        let resolved = resolve_fetch(
            &mut session,
            &Screen::new(),
            Err::<Vec<i32>, _>(RequestError::new("boom")),
            || vec![7],
            "banner",
        )
        .unwrap();

        assert!(resolved.is_mock());
        assert_eq!(resolved.data, vec![7]);
        assert_eq!(resolved.banner, Some("banner"));
        assert!(session.using_mock_data());
    }
}
