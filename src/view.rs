//! Presentation of the admin console.
//!
//! The bootstrapper never prints anything itself; it drives a [`View`], which
//! owns the credential input, the status banner, the admin panel and the
//! elections list.

use std::fmt::{Display, Formatter};
use std::io::{Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::model::{
    api::election::{ElectionDescription, Elections},
    common::election::ElectionId,
};

/// Styling of a status message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// A single-line status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub severity: Severity,
    pub message: String,
}

impl StatusBanner {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl Display for StatusBanner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// The surface the admin console is drawn on.
pub trait View {
    /// Current contents of the admin key input.
    fn credential_input(&self) -> String;
    fn set_credential_input(&self, value: &str);
    fn show_status(&self, banner: &StatusBanner);
    fn set_panel_visible(&self, visible: bool);
    /// Empty the elections list, then announce how many entries will follow.
    fn clear_elections(&self, count: usize);
    fn render_election(&self, id: &ElectionId, election: &ElectionDescription);
}

/// Rebuild the elections list from scratch.
pub fn render_elections<V: View + ?Sized>(view: &V, elections: &Elections) {
    view.clear_elections(elections.len());
    for (id, election) in elections {
        view.render_election(id, election);
    }
}

/// A [`View`] that writes to a terminal (or any other writer).
///
/// The elections list is only printed once listing is switched on, so that
/// commands which merely need a session don't dump it.
pub struct TerminalView<W = Stdout> {
    credential: Mutex<String>,
    listing: AtomicBool,
    out: Mutex<W>,
}

impl TerminalView<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            credential: Mutex::new(String::new()),
            listing: AtomicBool::new(false),
            out: Mutex::new(out),
        }
    }

    pub fn set_listing(&self, listing: bool) {
        self.listing.store(listing, Ordering::Relaxed);
    }

    fn listing(&self) -> bool {
        self.listing.load(Ordering::Relaxed)
    }

    /// Print a line. A broken terminal is not worth failing an admin action over.
    pub fn line(&self, text: impl Display) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write> View for TerminalView<W> {
    fn credential_input(&self) -> String {
        self.credential
            .lock()
            .map(|credential| credential.clone())
            .unwrap_or_default()
    }

    fn set_credential_input(&self, value: &str) {
        if let Ok(mut credential) = self.credential.lock() {
            *credential = value.to_string();
        }
    }

    fn show_status(&self, banner: &StatusBanner) {
        self.line(banner);
    }

    fn set_panel_visible(&self, visible: bool) {
        // The panel is the admin subcommands; they check the session themselves.
        debug!("Admin panel {}", if visible { "shown" } else { "hidden" });
    }

    fn clear_elections(&self, count: usize) {
        if !self.listing() {
            return;
        }
        self.line(format_args!(
            "{count} election{}",
            if count != 1 { "s" } else { "" }
        ));
    }

    fn render_election(&self, id: &ElectionId, election: &ElectionDescription) {
        if !self.listing() {
            return;
        }
        let title = if election.title.is_empty() {
            "(untitled)"
        } else {
            election.title.as_str()
        };
        let mut line = format!("  [{id}] {title} ({})", election.state);
        if let (Some(start), Some(end)) = (election.start_time, election.end_time) {
            line.push_str(&format!(
                " {} to {}",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%Y-%m-%d %H:%M")
            ));
        }
        if !election.candidates.is_empty() {
            let names: Vec<_> = election.candidates.iter().map(ToString::to_string).collect();
            line.push_str(&format!(": {}", names.join(", ")));
        }
        self.line(line);
    }
}

/// A [`View`] that remembers everything it was asked to show.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingView {
    pub credential: Mutex<String>,
    pub banners: Mutex<Vec<StatusBanner>>,
    pub panel_visible: Mutex<Option<bool>>,
    pub listed: Mutex<Option<Vec<ElectionId>>>,
}

#[cfg(test)]
impl RecordingView {
    pub fn last_banner(&self) -> Option<StatusBanner> {
        self.banners.lock().unwrap().last().cloned()
    }

    pub fn panel_visible(&self) -> Option<bool> {
        *self.panel_visible.lock().unwrap()
    }

    pub fn listed(&self) -> Option<Vec<ElectionId>> {
        self.listed.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl View for RecordingView {
    fn credential_input(&self) -> String {
        self.credential.lock().unwrap().clone()
    }

    fn set_credential_input(&self, value: &str) {
        *self.credential.lock().unwrap() = value.to_string();
    }

    fn show_status(&self, banner: &StatusBanner) {
        self.banners.lock().unwrap().push(banner.clone());
    }

    fn set_panel_visible(&self, visible: bool) {
        *self.panel_visible.lock().unwrap() = Some(visible);
    }

    fn clear_elections(&self, count: usize) {
        *self.listed.lock().unwrap() = Some(Vec::with_capacity(count));
    }

    fn render_election(&self, id: &ElectionId, _election: &ElectionDescription) {
        self.listed
            .lock()
            .unwrap()
            .get_or_insert_with(Vec::new)
            .push(id.clone());
    }
}
