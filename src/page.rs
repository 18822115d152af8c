//! Page surface — the affordances the session gate and form submitters drive.
//!
//! In a browser these are DOM elements and `window.location`; the CLI renders
//! them to the terminal through [`TerminalPage`].

use std::sync::Mutex;

use crate::config::DEFAULT_ENTRY_PAGE;

/// Browser-like page the client runs on.
pub trait Page: Send + Sync {
    /// Identifier of the current page (e.g. `"hub.html"`).
    fn page_id(&self) -> String;

    fn has_navbar(&self) -> bool;

    /// Make the navigation bar visible.
    fn show_navbar(&self);

    fn has_logout_control(&self) -> bool;

    /// Bind the logout control to the logout operation.
    fn wire_logout(&self);

    /// Leave the current page for `target`.
    fn navigate(&self, target: &str);

    /// Blocking user-visible notification.
    fn alert(&self, message: &str);
}

/// Page identifier for a navigation target: the last path segment with any
/// query or fragment removed. `None` when the target names a directory.
#[must_use]
pub fn page_id_of(target: &str) -> Option<String> {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
}

fn page_id_or_entry(target: &str) -> String {
    page_id_of(target).unwrap_or_else(|| DEFAULT_ENTRY_PAGE.to_owned())
}

// =============================================================================
// TERMINAL PAGE
// =============================================================================

#[derive(Debug)]
struct TerminalState {
    location: String,
    navbar_visible: bool,
    logout_wired: bool,
    navigations: Vec<String>,
}

/// Page rendered as lines on stderr.
///
/// Every page has a navbar and logout control; there is no markup to say
/// otherwise.
#[derive(Debug)]
pub struct TerminalPage {
    state: Mutex<TerminalState>,
}

impl TerminalPage {
    #[must_use]
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                location: page_id_or_entry(&page_id.into()),
                navbar_visible: false,
                logout_wired: false,
                navigations: Vec::new(),
            }),
        }
    }

    /// Most recent navigation target, if the page navigated at all.
    #[must_use]
    pub fn last_navigation(&self) -> Option<String> {
        self.lock().navigations.last().cloned()
    }

    #[must_use]
    pub fn navbar_visible(&self) -> bool {
        self.lock().navbar_visible
    }

    #[must_use]
    pub fn logout_wired(&self) -> bool {
        self.lock().logout_wired
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TerminalState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Page for TerminalPage {
    fn page_id(&self) -> String {
        self.lock().location.clone()
    }

    fn has_navbar(&self) -> bool {
        true
    }

    fn show_navbar(&self) {
        self.lock().navbar_visible = true;
        tracing::info!("navbar revealed");
        eprintln!("[navbar] visible");
    }

    fn has_logout_control(&self) -> bool {
        true
    }

    fn wire_logout(&self) {
        self.lock().logout_wired = true;
        eprintln!("[logout] available: gatepass logout");
    }

    fn navigate(&self, target: &str) {
        let mut state = self.lock();
        tracing::info!(from = %state.location, to = target, "navigate");
        eprintln!("-> {target}");
        state.location = page_id_or_entry(target);
        state.navigations.push(target.to_owned());
    }

    fn alert(&self, message: &str) {
        tracing::info!(text = message, "alert");
        eprintln!("[alert] {message}");
    }
}
