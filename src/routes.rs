//! Portal route table.
//!
//! ARCHITECTURE
//! ============
//! Public pages render unconditionally. Protected pages are each wrapped
//! in a fresh guard activation; a denied activation lands on whatever page
//! the configured login path resolves to.
//!
//! Path matching is forgiving about ASCII case, a trailing slash and any
//! query string or fragment, so `/Dashboard/?tab=1` is the dashboard.

use std::fmt;

use crate::guard::{self, GuardOutcome, MountState};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Resources,
    Contact,
    Login,
    SignUp,
    Dashboard,
    UploadDocument,
    UploadNotice,
    ManageDocuments,
    ManageNotices,
    UploadPyqs,
    ManagePyqs,
    NotFound,
}

impl Page {
    /// Every routable page, in navigation order. `NotFound` is not routable.
    pub const ALL: [Self; 13] = [
        Self::Home,
        Self::About,
        Self::Resources,
        Self::Contact,
        Self::Login,
        Self::SignUp,
        Self::Dashboard,
        Self::UploadDocument,
        Self::UploadNotice,
        Self::ManageDocuments,
        Self::ManageNotices,
        Self::UploadPyqs,
        Self::ManagePyqs,
    ];

    /// Canonical path; `None` for `NotFound`.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        Some(match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Resources => "/resources",
            Self::Contact => "/contact",
            Self::Login => "/login",
            Self::SignUp => "/signUp",
            Self::Dashboard => "/dashboard",
            Self::UploadDocument => "/uploadDocument",
            Self::UploadNotice => "/uploadNotice",
            Self::ManageDocuments => "/manageDocuments",
            Self::ManageNotices => "/manageNotices",
            Self::UploadPyqs => "/UploadPYQs",
            Self::ManagePyqs => "/ManagePYQs",
            Self::NotFound => return None,
        })
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Resources => "Resources",
            Self::Contact => "Contact",
            Self::Login => "Login",
            Self::SignUp => "Sign Up",
            Self::Dashboard => "Dashboard",
            Self::UploadDocument => "Upload Document",
            Self::UploadNotice => "Upload Notice",
            Self::ManageDocuments => "Manage Documents",
            Self::ManageNotices => "Manage Notices",
            Self::UploadPyqs => "Upload PYQs",
            Self::ManagePyqs => "Manage PYQs",
            Self::NotFound => "Not Found",
        }
    }

    /// Dashboard card text for protected tools; `None` elsewhere.
    #[must_use]
    pub fn description(self) -> Option<&'static str> {
        match self {
            Self::UploadDocument => Some("Upload and process new legal documents"),
            Self::ManageDocuments => Some("View, edit and organize your documents"),
            Self::UploadNotice => Some("Create and publish new legal notices"),
            Self::ManageNotices => Some("Track and update your legal notices"),
            Self::UploadPyqs => Some("Upload Previous Year Paper."),
            Self::ManagePyqs => Some("View and Edit Previous Year Paper."),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::UploadDocument
                | Self::UploadNotice
                | Self::ManageDocuments
                | Self::ManageNotices
                | Self::UploadPyqs
                | Self::ManagePyqs
        )
    }

    /// Tools listed on the dashboard, in card order.
    #[must_use]
    pub fn dashboard_menu() -> [Self; 6] {
        [
            Self::UploadDocument,
            Self::ManageDocuments,
            Self::UploadNotice,
            Self::ManageNotices,
            Self::UploadPyqs,
            Self::ManagePyqs,
        ]
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Map a location to its page.
#[must_use]
pub fn resolve(location: &str) -> Page {
    let path = location.split(['?', '#']).next().unwrap_or_default().trim();
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };
    if path.is_empty() {
        return Page::Home;
    }
    Page::ALL
        .into_iter()
        .find(|page| page.path().is_some_and(|p| p.eq_ignore_ascii_case(path)))
        .unwrap_or(Page::NotFound)
}

/// The page the user ends up looking at after opening a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub page: Page,
    pub location: String,
}

/// Open `location`, guarding it when protected.
///
/// A denied guard has already navigated to the login path; the rendered
/// page reflects that. A discarded activation cannot happen here because
/// the mount lives for the whole call, but it is treated like a denial.
pub async fn open(state: &AppState, location: &str) -> Rendered {
    state.navigator.navigate(location);
    let page = resolve(location);
    if !page.is_protected() {
        return Rendered { page, location: location.to_owned() };
    }

    let mount = MountState::new();
    match guard::activate(state, &mount, || page).await {
        GuardOutcome::Render(page) => Rendered { page, location: location.to_owned() },
        GuardOutcome::Redirect { to, .. } => Rendered { page: resolve(&to), location: to },
        GuardOutcome::Discarded => {
            let to = state.paths.login.clone();
            Rendered { page: resolve(&to), location: to }
        }
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
